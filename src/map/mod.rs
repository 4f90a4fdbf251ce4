//! Map viewport control
//!
//! `MapViewController` keeps a viewport (center + zoom) in step with the
//! form's coordinates and runs the marker-drag path: optimistic coordinate
//! update, then an async reverse lookup that fills in the address fields.

use crate::constants::map::{
    DEFAULT_LAT, DEFAULT_LNG, INITIAL_ZOOM, RECENTER_ZOOM, SELECTION_ZOOM,
};
use crate::form::LocationFormState;
use crate::geo::{Coordinates, GeoBackend};
use crate::location::{LocationPatch, SelectionResolver};
use crate::search::SequenceGate;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Visible map region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub center: Coordinates,
    pub zoom: u8,
}

/// Zoom levels and fallback center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapSettings {
    pub initial_zoom: u8,
    pub recenter_zoom: u8,
    pub selection_zoom: u8,
    pub default_center: Coordinates,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            initial_zoom: INITIAL_ZOOM,
            recenter_zoom: RECENTER_ZOOM,
            selection_zoom: SELECTION_ZOOM,
            default_center: Coordinates::new(DEFAULT_LAT, DEFAULT_LNG),
        }
    }
}

pub struct MapViewController<B> {
    backend: Arc<B>,
    resolver: Arc<SelectionResolver>,
    form: LocationFormState,
    settings: MapSettings,
    viewport: watch::Sender<ViewportState>,
    last_synced: Option<Coordinates>,
    reverse_gate: Arc<SequenceGate>,
}

impl<B: GeoBackend + 'static> MapViewController<B> {
    pub fn new(
        backend: Arc<B>,
        resolver: Arc<SelectionResolver>,
        form: LocationFormState,
        settings: MapSettings,
    ) -> Self {
        let coords = form.value().coordinates;
        let (viewport, _) = watch::channel(ViewportState {
            center: coords.unwrap_or(settings.default_center),
            zoom: settings.initial_zoom,
        });

        Self {
            backend,
            resolver,
            form,
            settings,
            viewport,
            last_synced: coords,
            reverse_gate: Arc::new(SequenceGate::new()),
        }
    }

    pub fn viewport(&self) -> ViewportState {
        *self.viewport.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewportState> {
        self.viewport.subscribe()
    }

    /// Where the marker sits: the form's coordinates, else the default center
    pub fn marker_position(&self) -> Coordinates {
        self.form
            .value()
            .coordinates
            .unwrap_or(self.settings.default_center)
    }

    fn set_view(&mut self, center: Coordinates, zoom: u8) {
        debug!("Viewport -> ({}, {}) @ {}", center.lat, center.lng, zoom);
        self.viewport.send_replace(ViewportState { center, zoom });
        self.last_synced = Some(center);
    }

    /// Follow coordinate changes made elsewhere; returns true if the view moved
    pub fn sync(&mut self) -> bool {
        let coords = self.form.value().coordinates;
        if coords == self.last_synced {
            return false;
        }

        match coords {
            Some(center) => {
                self.set_view(center, self.settings.recenter_zoom);
                true
            }
            None => {
                self.last_synced = None;
                false
            }
        }
    }

    /// Zoom in on a freshly picked search result
    pub fn focus_selection(&mut self, center: Coordinates) {
        self.set_view(center, self.settings.selection_zoom);
    }

    /// Explicit "center to marker"; false when there is nothing to center on
    pub fn recenter(&mut self) -> bool {
        match self.form.value().coordinates {
            Some(center) => {
                info!("Re-centering to {}, {}", center.lat, center.lng);
                self.set_view(center, self.settings.recenter_zoom);
                true
            }
            None => {
                warn!("Cannot recenter, coordinates missing");
                false
            }
        }
    }

    /// Marker drag finished at `coords`
    ///
    /// The form gets the new coordinates at once; the returned task fills in
    /// place name, city and country once the reverse lookup answers. A reply
    /// is dropped if a later drag started, or if the form's coordinates moved
    /// away from `coords` in the meantime.
    pub fn drag_end(&mut self, coords: Coordinates) -> JoinHandle<()> {
        self.form.update(LocationPatch::coordinates(coords));
        self.sync();

        let ticket = self.reverse_gate.issue();
        let gate = self.reverse_gate.clone();
        let backend = self.backend.clone();
        let resolver = self.resolver.clone();
        let form = self.form.clone();

        tokio::spawn(async move {
            let Some(hit) = resolver.reverse_hit(backend.as_ref(), coords).await else {
                return;
            };
            if !gate.is_latest(ticket) {
                debug!("Discarding stale reverse lookup for {:?}", coords);
                return;
            }

            form.modify_if(|current| {
                if current.coordinates != Some(coords) {
                    debug!("Form moved on from {:?}; ignoring reverse lookup", coords);
                    return false;
                }
                *current = resolver.merge_reverse(current, coords, &hit);
                true
            });
        })
    }
}
