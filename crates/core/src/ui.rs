//! Typed UI effects.
//!
//! Controllers never touch a page directly; every operation returns a
//! [`UiUpdate`] describing what the host shell should change. Patches
//! address elements by the stable ids and data attributes the pages carry,
//! never by rendered text.

use serde::Serialize;

/// Visual flavor of a toast or message dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

/// A transient notification shown in the toast container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Warning,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Info,
            message: message.into(),
        }
    }
}

/// A blocking message dialog (title + body), e.g. validation alerts and the
/// bulk-action placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageDialog {
    pub kind: ToastKind,
    pub title: String,
    pub body: String,
}

impl MessageDialog {
    #[must_use]
    pub fn new(kind: ToastKind, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// One mutation for the host shell to apply to the rendered page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DomPatch {
    SetText { target: String, text: String },
    SetHtml { target: String, html: String },
    SetValue { target: String, value: String },
    SetDisabled { target: String, disabled: bool },
    SetChecked { target: String, checked: bool },
    SetIndeterminate { target: String, on: bool },
    AddClass { target: String, class: String },
    RemoveClass { target: String, class: String },
    Show { target: String },
    Hide { target: String },
    Remove { target: String },
    OpenModal { target: String },
    CloseModal { target: String },
    ReloadPage,
    Redirect { url: String },
    /// Hand a line chart's data to the host's charting layer.
    RenderChart {
        target: String,
        labels: Vec<String>,
        values: Vec<f64>,
    },
}

/// The ordered outcome of a controller operation.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct UiUpdate {
    pub patches: Vec<DomPatch>,
    pub toasts: Vec<Toast>,
    pub dialogs: Vec<MessageDialog>,
}

impl UiUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, patch: DomPatch) {
        self.patches.push(patch);
    }

    pub fn set_text(&mut self, target: impl Into<String>, text: impl Into<String>) {
        self.patches.push(DomPatch::SetText {
            target: target.into(),
            text: text.into(),
        });
    }

    pub fn set_html(&mut self, target: impl Into<String>, html: impl Into<String>) {
        self.patches.push(DomPatch::SetHtml {
            target: target.into(),
            html: html.into(),
        });
    }

    pub fn set_value(&mut self, target: impl Into<String>, value: impl Into<String>) {
        self.patches.push(DomPatch::SetValue {
            target: target.into(),
            value: value.into(),
        });
    }

    pub fn set_disabled(&mut self, target: impl Into<String>, disabled: bool) {
        self.patches.push(DomPatch::SetDisabled {
            target: target.into(),
            disabled,
        });
    }

    pub fn show(&mut self, target: impl Into<String>) {
        self.patches.push(DomPatch::Show {
            target: target.into(),
        });
    }

    pub fn hide(&mut self, target: impl Into<String>) {
        self.patches.push(DomPatch::Hide {
            target: target.into(),
        });
    }

    pub fn open_modal(&mut self, target: impl Into<String>) {
        self.patches.push(DomPatch::OpenModal {
            target: target.into(),
        });
    }

    pub fn close_modal(&mut self, target: impl Into<String>) {
        self.patches.push(DomPatch::CloseModal {
            target: target.into(),
        });
    }

    pub fn toast(&mut self, toast: Toast) {
        self.toasts.push(toast);
    }

    pub fn dialog(&mut self, dialog: MessageDialog) {
        self.dialogs.push(dialog);
    }

    /// Append another update's effects after this one's.
    pub fn merge(&mut self, other: Self) {
        self.patches.extend(other.patches);
        self.toasts.extend(other.toasts);
        self.dialogs.extend(other.dialogs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_preserves_patch_order() {
        let mut update = UiUpdate::new();
        update.set_disabled("save-btn", true);
        update.set_text("save-btn", "Đang lưu...");
        update.set_disabled("save-btn", false);

        assert_eq!(update.patches.len(), 3);
        assert!(matches!(
            update.patches.first(),
            Some(DomPatch::SetDisabled { disabled: true, .. })
        ));
        assert!(matches!(
            update.patches.last(),
            Some(DomPatch::SetDisabled {
                disabled: false,
                ..
            })
        ));
    }

    #[test]
    fn test_merge_appends_in_order() {
        let mut first = UiUpdate::new();
        first.set_text("a", "1");
        let mut second = UiUpdate::new();
        second.set_text("b", "2");
        second.toast(Toast::success("xong"));

        first.merge(second);
        assert_eq!(first.patches.len(), 2);
        assert_eq!(first.toasts.len(), 1);
    }
}
