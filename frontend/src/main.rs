//! Stylebook demo entry point
//!
//! Mounts the theme switcher, either on the demo page itself or inside a
//! story preview frame, and keeps the page theme in sync until unload.

#[cfg(target_arch = "wasm32")]
mod theme_switcher;

#[cfg(target_arch = "wasm32")]
use std::sync::OnceLock;
#[cfg(target_arch = "wasm32")]
use stylebook::{ThemeConfig, platform, story_frame};
#[cfg(target_arch = "wasm32")]
use zoon::*;

/// Stores the theme sync task handle to prevent it from being dropped.
#[cfg(target_arch = "wasm32")]
static MAIN_TASK: OnceLock<TaskHandle> = OnceLock::new();

#[cfg(target_arch = "wasm32")]
const THEME_CONFIG: &str = include_str!("../theme.toml");

#[cfg(target_arch = "wasm32")]
pub fn main() {
    platform::init_logging();

    let config = ThemeConfig::from_toml(THEME_CONFIG).unwrap_or_else(|error| {
        zoon::eprintln!("⚠️ THEME: {error}, using defaults");
        ThemeConfig::default()
    });

    // The demo page is themed too, not only story frames.
    let (controller, embedding) = platform::page_controller(&config, true);
    zoon::println!("🎨 THEME: Starting theme engine ({embedding:?})");

    let handle = Task::start_droppable({
        let controller = controller.clone();
        async move {
            let theme = controller.initialize();
            if let Err(error) = story_frame::ensure_story_styles(
                embedding,
                controller.resolver(),
                controller.applier(),
                theme,
            )
            .await
            {
                zoon::eprintln!("⚠️ THEME: Story frame left unstyled: {error}");
            }
            controller.watch().await;
        }
    });
    let _ = MAIN_TASK.set(handle);

    if embedding.has_dom() {
        start_app("app", move || theme_switcher::theme_switcher(&controller));
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("stylebook runs in the browser; build it for wasm32-unknown-unknown");
}
