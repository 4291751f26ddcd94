use engine::DialogContent;

use super::npcs::NpcProfile;

/// Open/closed state of the conversation panel. While open it owns the
/// content the renderer displays; movement is frozen by the scene.
#[derive(Debug, Default)]
pub(crate) struct DialogBox {
    content: Option<DialogContent>,
}

impl DialogBox {
    pub(crate) fn is_open(&self) -> bool {
        self.content.is_some()
    }

    pub(crate) fn open(&mut self, profile: &NpcProfile, avatar_available: bool) {
        self.content = Some(DialogContent {
            name: profile.name.clone(),
            role: profile.role.clone(),
            text: profile.text.clone(),
            accent_rgba: profile.accent_rgba,
            avatar_sprite: avatar_available.then(|| profile.sprite_key.clone()),
        });
    }

    pub(crate) fn close(&mut self) {
        self.content = None;
    }

    pub(crate) fn content(&self) -> Option<&DialogContent> {
        self.content.as_ref()
    }
}
