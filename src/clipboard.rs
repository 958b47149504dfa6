/// Clipboard with an in-process fallback: copy and paste keep working in
/// environments without a system clipboard (SSH, headless CI).
pub struct Clipboard {
    system: Option<arboard::Clipboard>,
    local: String,
}

impl Clipboard {
    pub fn new() -> Self {
        Self {
            system: arboard::Clipboard::new().ok(),
            local: String::new(),
        }
    }

    pub fn copy(&mut self, text: &str) {
        self.local = text.to_string();
        if let Some(clip) = self.system.as_mut() {
            let _ = clip.set_text(text.to_string());
        }
    }

    pub fn paste(&mut self) -> String {
        if let Some(clip) = self.system.as_mut() {
            if let Ok(text) = clip.get_text() {
                return text;
            }
        }
        self.local.clone()
    }
}

impl Default for Clipboard {
    fn default() -> Self {
        Self::new()
    }
}
