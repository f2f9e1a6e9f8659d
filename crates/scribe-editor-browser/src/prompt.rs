use scribe_editor_core::Prompt;

/// `window.prompt`. A dismissed dialog reads as cancelled.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowPrompt;

impl Prompt for WindowPrompt {
    fn prompt(&mut self, message: &str) -> Option<String> {
        match gloo_utils::window().prompt_with_message(message) {
            Ok(answer) => answer,
            Err(e) => {
                tracing::debug!("prompt failed: {:?}", e);
                None
            }
        }
    }
}
