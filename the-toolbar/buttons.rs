use the_toolbar_event::{
  Getter,
  Setter,
};

use crate::{
  surface::{
    ButtonNode,
    ToolbarNode,
  },
  theme::ButtonStyles,
};

/// What every formatting button is built with: its styles and the editor
/// state accessors read from the store.
pub struct ButtonProps<'a, S> {
  pub theme:            &'a ButtonStyles,
  pub get_editor_state: Getter<S>,
  pub set_editor_state: Setter<S>,
}

pub trait ToolbarButton<S>: Send + Sync {
  fn render(&self, props: &ButtonProps<'_, S>) -> ToolbarNode;
}

/// Editor state that knows about inline styles on the current selection.
pub trait InlineStyleState: Sized {
  fn has_inline_style(&self, style: &str) -> bool;

  fn toggle_inline_style(self, style: &str) -> Self;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineStyleButton {
  label: String,
  style: String,
}

impl InlineStyleButton {
  pub fn new(label: impl Into<String>, style: impl Into<String>) -> Self {
    Self {
      label: label.into(),
      style: style.into(),
    }
  }

  pub fn bold() -> Self {
    Self::new("B", "BOLD")
  }

  pub fn italic() -> Self {
    Self::new("I", "ITALIC")
  }

  pub fn underline() -> Self {
    Self::new("U", "UNDERLINE")
  }

  pub fn code() -> Self {
    Self::new("</>", "CODE")
  }

  pub fn style(&self) -> &str {
    &self.style
  }

  /// Toggle this button's style on the editor's current selection.
  pub fn activate<S: InlineStyleState>(&self, props: &ButtonProps<'_, S>) {
    let state = (props.get_editor_state)();
    (props.set_editor_state)(state.toggle_inline_style(&self.style));
  }
}

impl<S: InlineStyleState> ToolbarButton<S> for InlineStyleButton {
  fn render(&self, props: &ButtonProps<'_, S>) -> ToolbarNode {
    let active = (props.get_editor_state)().has_inline_style(&self.style);
    let class = if active {
      format!("{} {}", props.theme.button, props.theme.active)
    } else {
      props.theme.button.clone()
    };
    ToolbarNode::Button(ButtonNode {
      wrapper_class: props.theme.button_wrapper.clone(),
      class,
      label: self.label.clone(),
      command: self.style.clone(),
      active,
    })
  }
}

#[cfg(test)]
mod tests {
  use std::{
    collections::BTreeSet,
    sync::Arc,
  };

  use parking_lot::Mutex;

  use super::*;

  #[derive(Debug, Clone, Default, PartialEq, Eq)]
  struct Styles(BTreeSet<String>);

  impl InlineStyleState for Styles {
    fn has_inline_style(&self, style: &str) -> bool {
      self.0.contains(style)
    }

    fn toggle_inline_style(mut self, style: &str) -> Self {
      if !self.0.remove(style) {
        self.0.insert(style.to_string());
      }
      self
    }
  }

  #[test]
  fn activating_toggles_the_style_through_the_accessors() {
    let editor = Arc::new(Mutex::new(Styles::default()));
    let theme = ButtonStyles::default();
    let props: ButtonProps<'_, Styles> = ButtonProps {
      theme:            &theme,
      get_editor_state: {
        let editor = editor.clone();
        Arc::new(move || editor.lock().clone())
      },
      set_editor_state: {
        let editor = editor.clone();
        Arc::new(move |state: Styles| *editor.lock() = state)
      },
    };

    let bold = InlineStyleButton::bold();
    let node = ToolbarButton::<Styles>::render(&bold, &props);
    assert!(!node.as_button().unwrap().active);

    bold.activate(&props);
    assert!(editor.lock().has_inline_style("BOLD"));

    let node = ToolbarButton::<Styles>::render(&bold, &props);
    let button = node.as_button().unwrap();
    assert!(button.active);
    assert_eq!(button.class, "inline-toolbar-button inline-toolbar-button-active");
    assert_eq!(button.label, "B");

    bold.activate(&props);
    assert_eq!(*editor.lock(), Styles::default());
  }
}
