//! Camera placement on a 2D canvas.
//!
//! Pointer events arrive in viewport coordinates and are converted to
//! canvas-local coordinates through the canvas's bounding rectangle, so the
//! model never depends on where the canvas sits on the page.

use serde::{Deserialize, Serialize};

/// Bounding rectangle of the canvas in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl CanvasRect {
    /// Convert viewport coordinates to canvas-local ones. `None` when the
    /// point lies outside the canvas.
    pub fn to_local(&self, client_x: f32, client_y: f32) -> Option<(f32, f32)> {
        let x = client_x - self.left;
        let y = client_y - self.top;
        let inside = (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y);
        inside.then_some((x, y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    /// Places a new marker.
    Primary,
    /// Rotates the marker under the pointer.
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub client_x: f32,
    pub client_y: f32,
    pub button: PointerButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    /// Canvas-local position.
    pub position: (f32, f32),
    /// Always in `0..360`.
    pub orientation_degrees: u16,
}

/// What a pointer event did to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    Placed { index: usize },
    Rotated { index: usize, orientation: u16 },
    /// The pointer was outside the canvas.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    /// A rotate action that did not land on any marker.
    #[error("no marker at pointer target (index {index:?})")]
    InvalidPointerTarget { index: Option<usize> },
}

/// Markers placed on one canvas. Markers are never removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    markers: Vec<Marker>,
    rotation_step: u16,
    hit_radius: f32,
}

impl Placement {
    /// `rotation_step` is taken modulo 360 and clamped to at least 1.
    pub fn new(rotation_step: u16, hit_radius: f32) -> Self {
        Self {
            markers: Vec::new(),
            rotation_step: (rotation_step % 360).max(1),
            hit_radius: hit_radius.max(0.0),
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn rotation_step(&self) -> u16 {
        self.rotation_step
    }

    /// Append a marker at canvas-local `(x, y)` facing 0 degrees.
    pub fn place(&mut self, x: f32, y: f32) -> usize {
        self.markers.push(Marker {
            position: (x, y),
            orientation_degrees: 0,
        });
        self.markers.len() - 1
    }

    /// Turn a marker by one step, wrapping at 360. Returns the new
    /// orientation.
    pub fn rotate(&mut self, index: usize) -> Result<u16, PlacementError> {
        let marker = self
            .markers
            .get_mut(index)
            .ok_or(PlacementError::InvalidPointerTarget { index: Some(index) })?;
        marker.orientation_degrees = (marker.orientation_degrees + self.rotation_step) % 360;
        Ok(marker.orientation_degrees)
    }

    /// The top-most marker within the hit radius of canvas-local `(x, y)`.
    pub fn marker_at(&self, x: f32, y: f32) -> Option<usize> {
        let r2 = self.hit_radius * self.hit_radius;
        self.markers.iter().rposition(|m| {
            let dx = m.position.0 - x;
            let dy = m.position.1 - y;
            dx * dx + dy * dy <= r2
        })
    }

    /// Route a pointer event: primary places, secondary rotates the marker
    /// under the pointer.
    pub fn handle_pointer(
        &mut self,
        rect: &CanvasRect,
        event: &PointerEvent,
    ) -> Result<PointerOutcome, PlacementError> {
        let Some((x, y)) = rect.to_local(event.client_x, event.client_y) else {
            return Ok(PointerOutcome::Ignored);
        };
        match event.button {
            PointerButton::Primary => Ok(PointerOutcome::Placed {
                index: self.place(x, y),
            }),
            PointerButton::Secondary => {
                let index = self
                    .marker_at(x, y)
                    .ok_or(PlacementError::InvalidPointerTarget { index: None })?;
                let orientation = self.rotate(index)?;
                Ok(PointerOutcome::Rotated { index, orientation })
            }
        }
    }
}
