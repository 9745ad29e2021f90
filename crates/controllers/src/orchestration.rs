//! Outcome dialog helpers: translate keys, show one dialog, await its result.

use crate::{
    dialog::{Dialog, DialogResult, DialogService},
    events::FlowContext,
    i18n::{keys, Translator},
};

pub async fn notify(
    dialogs: &dyn DialogService,
    translator: &dyn Translator,
    context: FlowContext,
    title_key: &str,
    message_key: &str,
) -> Option<DialogResult> {
    let dialog = Dialog::acknowledge(
        translator.translate(title_key),
        translator.translate(message_key),
        translator.translate(keys::OK),
    );
    tracing::debug!(flow = context.as_str(), title_key, message_key, "showing outcome dialog");
    dialogs.show(dialog).await
}

/// True only when "ok" was pressed; cancel and dismissal both count as no.
/// `params` fill `{{ name }}` placeholders in the message.
pub async fn confirm(
    dialogs: &dyn DialogService,
    translator: &dyn Translator,
    context: FlowContext,
    title_key: &str,
    message_key: &str,
    params: &[(&str, &str)],
) -> bool {
    let dialog = Dialog::confirm(
        translator.translate(title_key),
        translator.translate_with(message_key, params),
        translator.translate(keys::CANCEL),
        translator.translate(keys::OK),
    );
    tracing::debug!(flow = context.as_str(), title_key, "showing confirmation dialog");
    dialogs.show(dialog).await == Some(DialogResult::Ok)
}
