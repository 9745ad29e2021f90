use async_trait::async_trait;

/// Identifier a button reports back when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResult {
    Ok,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogButton {
    pub result: DialogResult,
    pub label: String,
    pub style: Option<ButtonStyle>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub title: String,
    pub message: String,
    pub buttons: Vec<DialogButton>,
}

impl Dialog {
    /// Single primary "ok" button.
    pub fn acknowledge(
        title: impl Into<String>,
        message: impl Into<String>,
        ok_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            buttons: vec![DialogButton {
                result: DialogResult::Ok,
                label: ok_label.into(),
                style: Some(ButtonStyle::Primary),
            }],
        }
    }

    /// Plain "cancel" followed by primary "ok".
    pub fn confirm(
        title: impl Into<String>,
        message: impl Into<String>,
        cancel_label: impl Into<String>,
        ok_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            buttons: vec![
                DialogButton {
                    result: DialogResult::Cancel,
                    label: cancel_label.into(),
                    style: None,
                },
                DialogButton {
                    result: DialogResult::Ok,
                    label: ok_label.into(),
                    style: Some(ButtonStyle::Primary),
                },
            ],
        }
    }
}

/// Modal dialog renderer.
///
/// Resolves with the `result` of the pressed button, or `None` when the
/// dialog was dismissed without pressing one.
#[async_trait]
pub trait DialogService: Send + Sync {
    async fn show(&self, dialog: Dialog) -> Option<DialogResult>;
}
