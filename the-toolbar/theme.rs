use serde::{
  Deserialize,
  Serialize,
};

/// Class names for the toolbar container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolbarStyles {
  pub toolbar: String,
}

impl Default for ToolbarStyles {
  fn default() -> Self {
    Self {
      toolbar: "inline-toolbar".to_string(),
    }
  }
}

/// Class names handed to every formatting button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonStyles {
  pub button_wrapper: String,
  pub button:         String,
  pub active:         String,
}

impl Default for ButtonStyles {
  fn default() -> Self {
    Self {
      button_wrapper: "inline-toolbar-button-wrapper".to_string(),
      button:         "inline-toolbar-button".to_string(),
      active:         "inline-toolbar-button-active".to_string(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
  pub toolbar_styles: ToolbarStyles,
  pub button_styles:  ButtonStyles,
}

impl Theme {
  pub fn from_toml(source: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(source)
  }
}
