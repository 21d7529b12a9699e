//! Conversion des événements d'entrée Winit vers les types Servo.
//!
//! Pas de chrome : la WebView occupe toute la fenêtre, les coordonnées du
//! curseur sont donc transmises telles quelles.
//!
//! Pour le clavier, les noms `Debug` de Winit (`KeyCode`, `NamedKey`)
//! coïncident avec les noms W3C que `keyboard_types` sait parser ; on passe
//! par `FromStr` au lieu d'une table de correspondance exhaustive.

use servo::{
    Code, InputEvent, Key, KeyState, KeyboardEvent, Location, Modifiers, MouseButton,
    MouseButtonAction, MouseButtonEvent, MouseLeftViewportEvent, MouseMoveEvent, NamedKey,
    WebView, WheelDelta, WheelEvent, WheelMode,
};
use webrender_api::units::DevicePoint;
use winit::event::{ElementState, KeyEvent, MouseButton as WinitMouseButton, MouseScrollDelta};
use winit::keyboard::{Key as WinitKey, KeyLocation, ModifiersState, PhysicalKey};

/// Pixels par "ligne" de molette, comme servoshell.
const LINE_HEIGHT: f32 = 76.0;

pub fn forward_cursor_moved(webview: &WebView, point: DevicePoint) {
    webview.notify_input_event(InputEvent::MouseMove(MouseMoveEvent::new(point.into())));
}

pub fn forward_cursor_left(webview: &WebView) {
    webview.notify_input_event(InputEvent::MouseLeftViewport(
        MouseLeftViewportEvent::default(),
    ));
}

pub fn forward_mouse_button(
    webview: &WebView,
    state: ElementState,
    button: WinitMouseButton,
    point: DevicePoint,
) {
    let action = match state {
        ElementState::Pressed => MouseButtonAction::Down,
        ElementState::Released => MouseButtonAction::Up,
    };
    webview.notify_input_event(InputEvent::MouseButton(MouseButtonEvent::new(
        action,
        mouse_button_from_winit(button),
        point.into(),
    )));
}

pub fn forward_wheel(webview: &WebView, delta: MouseScrollDelta, point: DevicePoint) {
    let (x, y, mode) = match delta {
        MouseScrollDelta::LineDelta(dx, dy) => (
            (dx * LINE_HEIGHT) as f64,
            (dy * LINE_HEIGHT) as f64,
            WheelMode::DeltaLine,
        ),
        MouseScrollDelta::PixelDelta(delta) => (delta.x, delta.y, WheelMode::DeltaPixel),
    };
    webview.notify_input_event(InputEvent::Wheel(WheelEvent::new(
        WheelDelta { x, y, z: 0.0, mode },
        point.into(),
    )));
}

pub fn forward_key(webview: &WebView, event: &KeyEvent, mods: ModifiersState) {
    webview.notify_input_event(InputEvent::Keyboard(keyboard_event_from_winit(event, mods)));
}

fn mouse_button_from_winit(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(id) => MouseButton::Other(id),
    }
}

fn keyboard_event_from_winit(event: &KeyEvent, mods: ModifiersState) -> KeyboardEvent {
    let state = match event.state {
        ElementState::Pressed => KeyState::Down,
        ElementState::Released => KeyState::Up,
    };
    KeyboardEvent::new_without_event(
        state,
        key_from_winit(&event.logical_key),
        code_from_winit(&event.physical_key),
        location_from_winit(event.location),
        modifiers_from_winit(mods),
        event.repeat,
        false,
    )
}

fn key_from_winit(key: &WinitKey) -> Key {
    match key {
        WinitKey::Character(text) => Key::Character(text.to_string()),
        WinitKey::Named(named) => Key::Named(
            format!("{named:?}")
                .parse::<NamedKey>()
                .unwrap_or(NamedKey::Unidentified),
        ),
        WinitKey::Unidentified(_) | WinitKey::Dead(_) => Key::Named(NamedKey::Unidentified),
    }
}

fn code_from_winit(physical: &PhysicalKey) -> Code {
    match physical {
        PhysicalKey::Code(code) => format!("{code:?}").parse().unwrap_or(Code::Unidentified),
        PhysicalKey::Unidentified(_) => Code::Unidentified,
    }
}

fn location_from_winit(location: KeyLocation) -> Location {
    match location {
        KeyLocation::Standard => Location::Standard,
        KeyLocation::Left => Location::Left,
        KeyLocation::Right => Location::Right,
        KeyLocation::Numpad => Location::Numpad,
    }
}

fn modifiers_from_winit(mods: ModifiersState) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    modifiers.set(Modifiers::SHIFT, mods.shift_key());
    modifiers.set(Modifiers::CONTROL, mods.control_key());
    modifiers.set(Modifiers::ALT, mods.alt_key());
    modifiers.set(Modifiers::META, mods.super_key());
    modifiers
}
