//! Theme switcher shown above every story

use stylebook::ThemeDescriptor;
use stylebook::theme::ThemeController;
use zoon::*;

pub fn theme_switcher(controller: &ThemeController) -> impl Element {
    Column::new()
        .s(Gap::new().y(6))
        .s(Padding::new().x(12).y(8))
        .item(
            Row::new()
                .s(Gap::new().x(8))
                .item(El::new().s(Font::new().size(12)).child(Text::new("Theme")))
                .items(
                    controller
                        .available_themes()
                        .iter()
                        .map(|descriptor| theme_button(controller, descriptor)),
                ),
        )
        .item_signal(controller.last_error_signal().map(|error| {
            error.map(|error| {
                El::new()
                    .s(Font::new().size(11))
                    .child(Text::new(&format!("Theme stylesheet failed to load: {error}")))
            })
        }))
}

fn theme_button(controller: &ThemeController, descriptor: &'static ThemeDescriptor) -> impl Element {
    let theme = descriptor.id;
    let label = descriptor.label;
    let controller_for_press = controller.clone();

    Button::new()
        .s(Padding::new().x(10).y(4))
        .s(RoundedCorners::all(4))
        .label_signal(controller.current_theme_signal().map(move |current| {
            if current == theme {
                Text::new(&format!("● {label}"))
            } else {
                Text::new(label)
            }
        }))
        .on_press(move || {
            controller_for_press.set_theme(theme);
        })
}
