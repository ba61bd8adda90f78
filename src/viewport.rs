//! Pan/zoom transform over a finished layout.
//!
//! Drag and pinch are two independent delta streams. Each keeps a live value that
//! follows the gesture and a committed value that only changes when its gesture
//! ends, so repeated frames never accumulate drift. Nothing here depends on the
//! layout beyond its overall content size.

use serde::Serialize;

use crate::config::ViewportConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// `screen = content * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    DragStart,
    /// Cumulative offset since the drag started.
    DragMove { dx: f32, dy: f32 },
    DragEnd,
    PinchStart,
    /// Cumulative scale factor since the pinch started.
    PinchMove { factor: f32 },
    PinchEnd,
}

#[derive(Debug, Clone)]
pub struct Viewport {
    viewport: Size,
    content: Size,
    config: ViewportConfig,
    live: Transform,
    committed: Transform,
    dragging: bool,
    pinching: bool,
}

impl Viewport {
    /// New controller fitted to show the whole content.
    pub fn new(viewport: Size, content: Size, config: ViewportConfig) -> Self {
        let mut view = Self {
            viewport,
            content,
            config,
            live: Transform::default(),
            committed: Transform::default(),
            dragging: false,
            pinching: false,
        };
        view.fit();
        view
    }

    /// Largest zoom-out that still shows the whole content, never above natural size.
    /// Degenerate sizes (zero, negative or non-finite) fall back to natural size.
    pub fn min_scale(&self) -> f32 {
        let ratio = |outer: f32, inner: f32| {
            let value = outer / inner;
            if value.is_finite() && value > 0.0 { value } else { 1.0 }
        };
        ratio(self.viewport.width, self.content.width)
            .min(ratio(self.viewport.height, self.content.height))
            .min(1.0)
    }

    pub fn max_scale(&self) -> f32 {
        let multiplier = if self.config.zoom_in_multiplier.is_finite() {
            self.config.zoom_in_multiplier
        } else {
            1.0
        };
        (self.min_scale() * multiplier).max(1.0)
    }

    pub fn clamp_scale(&self, scale: f32) -> f32 {
        scale.clamp(self.min_scale(), self.max_scale())
    }

    pub fn transform(&self) -> Transform {
        self.live
    }

    pub fn committed(&self) -> Transform {
        self.committed
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport
    }

    pub fn content_size(&self) -> Size {
        self.content
    }

    pub fn is_gesture_active(&self) -> bool {
        self.dragging || self.pinching
    }

    /// Minimum scale with the content centered in the viewport.
    pub fn fit(&mut self) {
        let scale = self.min_scale();
        self.committed = Transform {
            scale,
            translate_x: (self.viewport.width - self.content.width * scale) / 2.0,
            translate_y: (self.viewport.height - self.content.height * scale) / 2.0,
        };
        if !self.committed.translate_x.is_finite() {
            self.committed.translate_x = 0.0;
        }
        if !self.committed.translate_y.is_finite() {
            self.committed.translate_y = 0.0;
        }
        self.live = self.committed;
        self.dragging = false;
        self.pinching = false;
    }

    /// Commits `scale`, clamped into range, outside of any gesture.
    pub fn set_scale(&mut self, scale: f32) {
        if !scale.is_finite() {
            return;
        }
        self.committed.scale = self.clamp_scale(scale);
        self.live.scale = self.committed.scale;
    }

    pub fn set_translate(&mut self, x: f32, y: f32) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.committed.translate_x = x;
        self.committed.translate_y = y;
        self.live.translate_x = x;
        self.live.translate_y = y;
    }

    pub fn apply(&mut self, event: GestureEvent) {
        match event {
            GestureEvent::DragStart => self.drag_start(),
            GestureEvent::DragMove { dx, dy } => self.drag_update(dx, dy),
            GestureEvent::DragEnd => self.drag_end(),
            GestureEvent::PinchStart => self.pinch_start(),
            GestureEvent::PinchMove { factor } => self.pinch_update(factor),
            GestureEvent::PinchEnd => self.pinch_end(),
        }
    }

    pub fn drag_start(&mut self) {
        self.dragging = true;
        self.live.translate_x = self.committed.translate_x;
        self.live.translate_y = self.committed.translate_y;
    }

    pub fn drag_update(&mut self, dx: f32, dy: f32) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        self.dragging = true;
        self.live.translate_x = self.committed.translate_x + dx;
        self.live.translate_y = self.committed.translate_y + dy;
    }

    pub fn drag_end(&mut self) {
        self.committed.translate_x = self.live.translate_x;
        self.committed.translate_y = self.live.translate_y;
        self.dragging = false;
    }

    pub fn pinch_start(&mut self) {
        self.pinching = true;
        self.live.scale = self.committed.scale;
    }

    pub fn pinch_update(&mut self, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.pinching = true;
        self.live.scale = self.clamp_scale(self.committed.scale * factor);
    }

    pub fn pinch_end(&mut self) {
        self.committed.scale = self.live.scale;
        self.pinching = false;
    }

    pub fn set_viewport_size(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.reclamp();
    }

    pub fn set_content_size(&mut self, content: Size) {
        self.content = content;
        self.reclamp();
    }

    /// Pulls the committed scale back into range; an in-range scale is left untouched.
    fn reclamp(&mut self) {
        let clamped = self.clamp_scale(self.committed.scale);
        if clamped != self.committed.scale {
            tracing::debug!(from = self.committed.scale, to = clamped, "viewport scale reclamped");
            self.committed.scale = clamped;
        }
        self.live.scale = if self.pinching {
            self.clamp_scale(self.live.scale)
        } else {
            self.committed.scale
        };
    }

    pub fn screen_to_content(&self, sx: f32, sy: f32) -> (f32, f32) {
        (
            (sx - self.live.translate_x) / self.live.scale,
            (sy - self.live.translate_y) / self.live.scale,
        )
    }

    pub fn content_to_screen(&self, cx: f32, cy: f32) -> (f32, f32) {
        (
            cx * self.live.scale + self.live.translate_x,
            cy * self.live.scale + self.live.translate_y,
        )
    }
}
