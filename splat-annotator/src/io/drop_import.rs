use bevy::prelude::*;

use crate::engine::hud::StatusEvent;
use crate::engine::splat::SplatSession;
use crate::io::AlertEvent;
use crate::markers::MarkersChanged;
use crate::markers::store::{MarkerStore, parse_marker_file};

/// Raw marker JSON arriving by drag-and-drop, from either platform's intake.
#[derive(Event, Clone, Debug)]
pub struct ImportMarkersEvent {
    pub file_name: String,
    pub contents: String,
}

/// Replaces the marker set from dropped JSON. A malformed payload is logged
/// and the existing markers survive untouched; without a splat loaded the
/// import aborts with a user-facing alert.
pub fn handle_marker_imports(
    mut events: EventReader<ImportMarkersEvent>,
    session: Res<SplatSession>,
    mut store: ResMut<MarkerStore>,
    mut changed: EventWriter<MarkersChanged>,
    mut status: EventWriter<StatusEvent>,
    mut alerts: EventWriter<AlertEvent>,
) {
    for event in events.read() {
        if !session.is_loaded() {
            alerts.write(AlertEvent("No splat file loaded!".into()));
            continue;
        }
        match parse_marker_file(&event.contents) {
            Ok(file) => {
                store.replace_from_file(&file);
                changed.write_default();
                info!("Imported {} markers from {}", store.len(), event.file_name);
                status.write(StatusEvent(format!(
                    "Imported {} markers from {}",
                    store.len(),
                    event.file_name
                )));
            }
            Err(err) => {
                warn!("Rejected marker import {}: {err}", event.file_name);
            }
        }
    }
}


/// Native intake: window file-drop events, `.json` only.
#[cfg(not(target_arch = "wasm32"))]
pub fn native_drop_intake(
    mut events: EventReader<FileDragAndDrop>,
    mut imports: EventWriter<ImportMarkersEvent>,
) {
    for event in events.read() {
        let FileDragAndDrop::DroppedFile { path_buf, .. } = event else {
            continue;
        };
        if path_buf.extension().and_then(|e| e.to_str()) != Some("json") {
            warn!("Ignoring dropped non-JSON file: {}", path_buf.display());
            continue;
        }
        match std::fs::read_to_string(path_buf) {
            Ok(contents) => {
                imports.write(ImportMarkersEvent {
                    file_name: path_buf
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    contents,
                });
            }
            Err(err) => warn!("Failed to read dropped file {}: {err}", path_buf.display()),
        }
    }
}

/// Thread-safe queue bridging the JS drop callbacks onto the frame schedule.
#[cfg(target_arch = "wasm32")]
#[derive(Resource)]
pub struct DropQueue(std::sync::Arc<std::sync::Mutex<Vec<ImportMarkersEvent>>>);

/// Wasm intake: `dragover`/`drop` listeners on the window; each dropped
/// `.json` file is read asynchronously and queued for the next frame.
#[cfg(target_arch = "wasm32")]
pub fn setup_drop_listener(mut commands: Commands) {
    use std::sync::{Arc, Mutex};
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    let queue: Arc<Mutex<Vec<ImportMarkersEvent>>> = Arc::new(Mutex::new(Vec::new()));

    let Some(window) = web_sys::window() else {
        return;
    };

    // The browser rejects drops unless dragover is suppressed
    let dragover = Closure::wrap(Box::new(move |event: web_sys::DragEvent| {
        event.prevent_default();
    }) as Box<dyn FnMut(web_sys::DragEvent)>);
    if window
        .add_event_listener_with_callback("dragover", dragover.as_ref().unchecked_ref())
        .is_ok()
    {
        dragover.forget();
    }

    let queue_clone = queue.clone();
    let on_drop = Closure::wrap(Box::new(move |event: web_sys::DragEvent| {
        event.prevent_default();
        let Some(files) = event.data_transfer().and_then(|dt| dt.files()) else {
            return;
        };
        for i in 0..files.length() {
            let Some(file) = files.get(i) else {
                continue;
            };
            let name = file.name();
            if !name.ends_with(".json") {
                continue;
            }
            read_dropped_file(file, name, queue_clone.clone());
        }
    }) as Box<dyn FnMut(web_sys::DragEvent)>);
    if window
        .add_event_listener_with_callback("drop", on_drop.as_ref().unchecked_ref())
        .is_ok()
    {
        on_drop.forget();
    }

    commands.insert_resource(DropQueue(queue));
}

#[cfg(target_arch = "wasm32")]
fn read_dropped_file(
    file: web_sys::File,
    name: String,
    queue: std::sync::Arc<std::sync::Mutex<Vec<ImportMarkersEvent>>>,
) {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    let Ok(reader) = web_sys::FileReader::new() else {
        return;
    };
    let reader_handle = reader.clone();
    let onload = Closure::wrap(Box::new(move |_event: web_sys::ProgressEvent| {
        let Ok(result) = reader_handle.result() else {
            return;
        };
        let Some(contents) = result.as_string() else {
            return;
        };
        if let Ok(mut queue) = queue.lock() {
            queue.push(ImportMarkersEvent {
                file_name: name.clone(),
                contents,
            });
        }
    }) as Box<dyn FnMut(web_sys::ProgressEvent)>);

    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    if reader.read_as_text(&file).is_ok() {
        onload.forget();
    }
}

/// Drains the JS-side queue into frame-schedule events.
#[cfg(target_arch = "wasm32")]
pub fn drain_drop_queue(
    queue: Option<Res<DropQueue>>,
    mut imports: EventWriter<ImportMarkersEvent>,
) {
    let Some(queue) = queue else {
        return;
    };
    let drained = if let Ok(mut queue) = queue.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };
    for event in drained {
        imports.write(event);
    }
}
