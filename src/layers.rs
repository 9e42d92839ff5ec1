use serde::{Deserialize, Serialize};

/// A named group of placed images with a single on/off visibility flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

fn visible_by_default() -> bool {
    true
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
        }
    }
}

/// The layer list and which layer new images go to. There is always at
/// least one layer and `active` always names one of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layers {
    layers: Vec<Layer>,
    active: usize,
}

impl Default for Layers {
    fn default() -> Self {
        Self {
            layers: vec![Layer::new("Layer 1")],
            active: 0,
        }
    }
}

impl Layers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from saved parts. An empty list gives the single default
    /// layer; an out-of-range active index falls back to the first layer.
    pub fn from_parts(layers: Vec<Layer>, active: usize) -> Self {
        if layers.is_empty() {
            return Self::default();
        }
        let active = if active < layers.len() { active } else { 0 };
        Self { layers, active }
    }

    pub fn as_slice(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &Layer {
        &self.layers[self.active]
    }

    /// Append "Layer N" and make it the active layer. Returns its index.
    pub fn add(&mut self) -> usize {
        let name = format!("Layer {}", self.layers.len() + 1);
        self.layers.push(Layer::new(name));
        self.active = self.layers.len() - 1;
        self.active
    }

    pub fn set_active(&mut self, index: usize) -> bool {
        if index < self.layers.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    pub fn set_visible(&mut self, index: usize, visible: bool) -> bool {
        match self.layers.get_mut(index) {
            Some(layer) => {
                layer.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Images on a layer that does not exist are never drawn
    pub fn is_visible(&self, index: usize) -> bool {
        self.layers.get(index).is_some_and(|layer| layer.visible)
    }
}
