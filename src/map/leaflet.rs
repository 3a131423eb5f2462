//! Leaflet binding driven through `js_sys::Reflect`
//!
//! Leaflet itself is loaded by the host page and reached as `window.L`.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::marker_style::{
    label_icon_html, train_icon_html, LABEL_ICON_ANCHOR, LABEL_ICON_SIZE, TRAIN_ICON_ANCHOR,
    TRAIN_ICON_SIZE,
};
use super::reconciler::MarkerSurface;
use crate::constants::{
    BASE_TILE_ATTRIBUTION, BASE_TILE_URL, MAP_CENTER, MAP_ZOOM, OVERLAY_TILE_ATTRIBUTION,
};
use crate::models::{RailwayTrack, TileStyle, TrainPosition};

const MAX_ZOOM: f64 = 19.0;
const TRACK_WEIGHT: f64 = 4.0;
const TRACK_OPACITY: f64 = 0.8;

fn method(target: &JsValue, name: &str) -> Result<js_sys::Function, JsValue> {
    js_sys::Reflect::get(target, &JsValue::from_str(name))?
        .dyn_into::<js_sys::Function>()
        .map_err(|_| JsValue::from_str(&format!("{name} not a function")))
}

fn call(target: &JsValue, name: &str, args: &[&JsValue]) -> Result<JsValue, JsValue> {
    let func = method(target, name)?;
    let args: js_sys::Array = args.iter().copied().collect();
    func.apply(target, &args)
}

fn options(entries: &[(&str, JsValue)]) -> Result<js_sys::Object, JsValue> {
    let object = js_sys::Object::new();
    for (key, value) in entries {
        js_sys::Reflect::set(&object, &JsValue::from_str(key), value)?;
    }
    Ok(object)
}

fn pair(values: [f64; 2]) -> js_sys::Array {
    let array = js_sys::Array::new();
    array.push(&JsValue::from_f64(values[0]));
    array.push(&JsValue::from_f64(values[1]));
    array
}

fn request_animation_frame<F>(f: F)
where
    F: FnOnce() + 'static,
{
    let closure = Closure::once(f);
    if let Some(window) = web_sys::window() {
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// A marker or label placed on the map
///
/// Holds the click listener so it lives exactly as long as the layer.
pub struct LeafletLayer {
    layer: JsValue,
    _on_click: Option<Closure<dyn FnMut()>>,
}

/// A mounted Leaflet map with a base layer, a railway overlay and a marker group
pub struct LeafletMap {
    leaflet: JsValue,
    map: JsValue,
    overlay: JsValue,
    marker_layer: JsValue,
    on_select: Rc<dyn Fn(String)>,
}

impl LeafletMap {
    /// Create the map inside `container`
    ///
    /// `on_select` receives the id of a clicked train.
    ///
    /// # Errors
    ///
    /// Returns an error if Leaflet is not loaded or any setup call fails
    pub fn mount(
        container: &web_sys::HtmlElement,
        style: TileStyle,
        on_select: Rc<dyn Fn(String)>,
    ) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let leaflet = js_sys::Reflect::get(&window, &JsValue::from_str("L"))?;
        if leaflet.is_undefined() {
            return Err(JsValue::from_str("Leaflet is not loaded"));
        }

        let container: &JsValue = container;
        let map_options = options(&[("zoomControl", JsValue::TRUE)])?;
        let map = call(&leaflet, "map", &[container, &map_options])?;
        call(&map, "setView", &[&pair(MAP_CENTER), &JsValue::from_f64(MAP_ZOOM)])?;

        let base_options = options(&[
            ("attribution", JsValue::from_str(BASE_TILE_ATTRIBUTION)),
            ("maxZoom", JsValue::from_f64(MAX_ZOOM)),
        ])?;
        let base = call(&leaflet, "tileLayer", &[&JsValue::from_str(BASE_TILE_URL), &base_options])?;
        call(&base, "addTo", &[&map])?;

        let overlay_options = options(&[
            ("attribution", JsValue::from_str(OVERLAY_TILE_ATTRIBUTION)),
            ("maxZoom", JsValue::from_f64(MAX_ZOOM)),
        ])?;
        let overlay = call(
            &leaflet,
            "tileLayer",
            &[&JsValue::from_str(&style.overlay_url()), &overlay_options],
        )?;
        call(&overlay, "addTo", &[&map])?;

        let marker_layer = call(&leaflet, "layerGroup", &[])?;
        call(&marker_layer, "addTo", &[&map])?;

        let mounted = Self {
            leaflet,
            map,
            overlay,
            marker_layer,
            on_select,
        };
        mounted.invalidate_size_delayed();
        Ok(mounted)
    }

    /// Swap the overlay tiles without touching any other layer
    ///
    /// # Errors
    ///
    /// Returns an error if the overlay rejects the new URL
    pub fn set_tile_style(&self, style: TileStyle) -> Result<(), JsValue> {
        call(&self.overlay, "setUrl", &[&JsValue::from_str(&style.overlay_url())])?;
        Ok(())
    }

    /// Draw static track polylines beneath the markers
    ///
    /// # Errors
    ///
    /// Returns an error if a polyline cannot be created
    pub fn draw_tracks(&self, tracks: &[RailwayTrack]) -> Result<(), JsValue> {
        for track in tracks {
            let points: js_sys::Array = track.coordinates.iter().map(|c| pair(*c)).collect();
            let line_options = options(&[
                ("color", JsValue::from_str(track.kind.color())),
                ("weight", JsValue::from_f64(TRACK_WEIGHT)),
                ("opacity", JsValue::from_f64(TRACK_OPACITY)),
            ])?;
            let line = call(&self.leaflet, "polyline", &[&points, &line_options])?;
            call(&line, "addTo", &[&self.map])?;
        }
        Ok(())
    }

    /// Tear the map down; markers must be released first
    ///
    /// # Errors
    ///
    /// Returns an error if Leaflet fails to remove the map
    pub fn remove(&self) -> Result<(), JsValue> {
        call(&self.map, "remove", &[])?;
        Ok(())
    }

    fn invalidate_size_delayed(&self) {
        let map = self.map.clone();
        request_animation_frame(move || {
            request_animation_frame(move || {
                let _ = call(&map, "invalidateSize", &[]);
            });
        });
    }

    fn div_icon(&self, class_name: &str, html: &str, size: [f64; 2], anchor: [f64; 2]) -> Result<JsValue, JsValue> {
        let icon_options = options(&[
            ("className", JsValue::from_str(class_name)),
            ("html", JsValue::from_str(html)),
            ("iconSize", pair(size).into()),
            ("iconAnchor", pair(anchor).into()),
        ])?;
        call(&self.leaflet, "divIcon", &[&icon_options])
    }

    fn train_icon(&self, train: &TrainPosition) -> Result<JsValue, JsValue> {
        self.div_icon("train-marker", &train_icon_html(train), TRAIN_ICON_SIZE, TRAIN_ICON_ANCHOR)
    }

    fn label_icon(&self, train: &TrainPosition) -> Result<JsValue, JsValue> {
        self.div_icon("train-label", &label_icon_html(train), LABEL_ICON_SIZE, LABEL_ICON_ANCHOR)
    }

    fn place(&self, train: &TrainPosition, icon: &JsValue, interactive: bool) -> Result<JsValue, JsValue> {
        let marker_options = options(&[
            ("icon", icon.clone()),
            ("interactive", JsValue::from_bool(interactive)),
        ])?;
        let marker = call(&self.leaflet, "marker", &[&pair(train.coordinate()), &marker_options])?;
        call(&marker, "addTo", &[&self.marker_layer])?;
        Ok(marker)
    }

    fn move_layer(layer: &JsValue, train: &TrainPosition, icon: &JsValue) -> Result<(), JsValue> {
        call(layer, "setLatLng", &[&pair(train.coordinate())])?;
        call(layer, "setIcon", &[icon])?;
        Ok(())
    }
}

impl MarkerSurface for LeafletMap {
    type Handle = LeafletLayer;
    type Error = JsValue;

    fn add_marker(&mut self, train: &TrainPosition) -> Result<LeafletLayer, JsValue> {
        let icon = self.train_icon(train)?;
        let marker = self.place(train, &icon, true)?;

        let on_select = Rc::clone(&self.on_select);
        let id = train.id.clone();
        let on_click = Closure::wrap(Box::new(move || on_select(id.clone())) as Box<dyn FnMut()>);

        if let Err(e) = call(&marker, "on", &[&JsValue::from_str("click"), on_click.as_ref()]) {
            let _ = call(&self.marker_layer, "removeLayer", &[&marker]);
            return Err(e);
        }

        Ok(LeafletLayer {
            layer: marker,
            _on_click: Some(on_click),
        })
    }

    fn add_label(&mut self, train: &TrainPosition) -> Result<LeafletLayer, JsValue> {
        let icon = self.label_icon(train)?;
        let label = self.place(train, &icon, false)?;
        Ok(LeafletLayer {
            layer: label,
            _on_click: None,
        })
    }

    fn update_marker(&mut self, handle: &LeafletLayer, train: &TrainPosition) -> Result<(), JsValue> {
        let icon = self.train_icon(train)?;
        Self::move_layer(&handle.layer, train, &icon)
    }

    fn update_label(&mut self, handle: &LeafletLayer, train: &TrainPosition) -> Result<(), JsValue> {
        let icon = self.label_icon(train)?;
        Self::move_layer(&handle.layer, train, &icon)
    }

    fn remove(&mut self, handle: LeafletLayer) {
        let _ = call(&handle.layer, "off", &[]);
        let _ = call(&self.marker_layer, "removeLayer", &[&handle.layer]);
    }
}
