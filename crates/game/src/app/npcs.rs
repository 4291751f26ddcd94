use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

const PROFILE_FILE_NAME: &str = "npcs.json";

/// One crew member on the set: placement, dialog, and the sprite that
/// represents them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct NpcProfile {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) role: String,
    pub(crate) text: String,
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) image_path: String,
    pub(crate) sprite_key: String,
    pub(crate) accent_rgba: [u8; 4],
}

/// Reads crew profiles from `npcs.json` in the assets directory. A missing
/// or malformed file falls back to the built-in roster so the set is never
/// empty.
pub(crate) fn load_profiles(assets_dir: &Path) -> Vec<NpcProfile> {
    let path = assets_dir.join(PROFILE_FILE_NAME);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) => {
            info!(
                path = %path.display(),
                error = %err,
                "npc_profiles_file_unavailable_using_builtin"
            );
            return builtin_profiles();
        }
    };

    let deserializer = &mut serde_json::Deserializer::from_str(&raw);
    match serde_path_to_error::deserialize::<_, Vec<NpcProfile>>(deserializer) {
        Ok(profiles) if profiles.is_empty() => {
            warn!(path = %path.display(), "npc_profiles_file_empty_using_builtin");
            builtin_profiles()
        }
        Ok(profiles) => {
            info!(
                path = %path.display(),
                profile_count = profiles.len(),
                "npc_profiles_loaded"
            );
            profiles
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                json_path = %err.path(),
                error = %err,
                "npc_profiles_parse_failed_using_builtin"
            );
            builtin_profiles()
        }
    }
}

pub(crate) fn builtin_profiles() -> Vec<NpcProfile> {
    vec![
        NpcProfile {
            id: "director".to_string(),
            name: "Director".to_string(),
            role: "Creative lead".to_string(),
            text: "I shape the story on set and keep every department aligned with the vision."
                .to_string(),
            x: 620.0,
            y: 250.0,
            image_path: "npcs/director.png".to_string(),
            sprite_key: "npc-director".to_string(),
            accent_rgba: [255, 183, 3, 255],
        },
        NpcProfile {
            id: "camera".to_string(),
            name: "DOP".to_string(),
            role: "Camera department".to_string(),
            text: "I frame the shots and move the camera. Ask my 1st AC for details about the lenses."
                .to_string(),
            x: 760.0,
            y: 520.0,
            image_path: "npcs/camera.png".to_string(),
            sprite_key: "npc-camera".to_string(),
            accent_rgba: [76, 201, 240, 255],
        },
        NpcProfile {
            id: "producer".to_string(),
            name: "Producer".to_string(),
            role: "Production".to_string(),
            text: "Talk to me about budget and scheduling.".to_string(),
            x: 1000.0,
            y: 380.0,
            image_path: "npcs/producer.png".to_string(),
            sprite_key: "npc-producer".to_string(),
            accent_rgba: [144, 190, 109, 255],
        },
        NpcProfile {
            id: "gaffer".to_string(),
            name: "Gaffer".to_string(),
            role: "Light department".to_string(),
            text: "I take care of the light. Ask me for a greenscreen.".to_string(),
            x: 370.0,
            y: 620.0,
            image_path: "npcs/gaffer.png".to_string(),
            sprite_key: "npc-gaffer".to_string(),
            accent_rgba: [155, 93, 229, 255],
        },
        NpcProfile {
            id: "vfx".to_string(),
            name: "VFX equipment".to_string(),
            role: "Visual Effects".to_string(),
            text: "My VFX equipment. Keep it in close distance to the set.".to_string(),
            x: 370.0,
            y: 320.0,
            image_path: "npcs/vfx-set.png".to_string(),
            sprite_key: "npc-vfx".to_string(),
            accent_rgba: [155, 93, 229, 255],
        },
    ]
}
