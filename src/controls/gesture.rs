use tracing::{debug, trace};

/// Which half of the surface a vertical drag started in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// The one-time routing decision for a drag session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisLock {
    #[default]
    Undecided,
    Horizontal,
    Vertical(Side),
}

/// Consumer a locked drag feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    Seek,
    Brightness,
    Volume,
}

impl AxisLock {
    pub fn target(self) -> Option<DragTarget> {
        match self {
            AxisLock::Undecided => None,
            AxisLock::Horizontal => Some(DragTarget::Seek),
            AxisLock::Vertical(Side::Left) => Some(DragTarget::Brightness),
            AxisLock::Vertical(Side::Right) => Some(DragTarget::Volume),
        }
    }
}

/// State of one physical drag, from drag-start to drag-end
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    pub origin_x: f32,
    pub origin_y: f32,
    pub touchable_width: u32,
    pub touchable_height: u32,
    pub axis_lock: AxisLock,
    pub is_within_effective_region: bool,
}

/// A delta after routing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutedDelta {
    pub target: DragTarget,
    /// True for the delta that decided the lock
    pub locked_now: bool,
    pub dx: f32,
    pub dy: f32,
    pub touchable_width: u32,
    pub touchable_height: u32,
}

/// Classifies drags into seek or volume/brightness adjustment.
///
/// The first non-zero delta of a session picks the axis; equal magnitudes
/// resolve to horizontal. After that every delta goes to the same consumer
/// regardless of its own direction. Drags that start inside the edge margin
/// are ignored for their whole lifetime.
#[derive(Debug, Clone)]
pub struct GestureDisambiguator {
    edge_margin: f32,
    session: Option<GestureSession>,
}

impl GestureDisambiguator {
    pub fn new(edge_margin: f32) -> Self {
        Self {
            edge_margin,
            session: None,
        }
    }

    pub fn edge_margin(&self) -> f32 {
        self.edge_margin
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// Begin a new session. Returns whether the drag will be honored.
    pub fn drag_start(&mut self, x: f32, y: f32, width: u32, height: u32) -> bool {
        let effective = self.is_within_effective_region(x, y, width, height);
        if !effective {
            debug!("Drag at ({}, {}) starts inside the edge margin, ignoring", x, y);
        }

        self.session = Some(GestureSession {
            origin_x: x,
            origin_y: y,
            touchable_width: width,
            touchable_height: height,
            axis_lock: AxisLock::Undecided,
            is_within_effective_region: effective,
        });
        effective
    }

    pub fn drag_delta(&mut self, dx: f32, dy: f32) -> Option<RoutedDelta> {
        let session = self.session.as_mut()?;
        if !session.is_within_effective_region {
            return None;
        }

        let mut locked_now = false;
        if session.axis_lock == AxisLock::Undecided {
            if dx == 0.0 && dy == 0.0 {
                return None;
            }
            session.axis_lock = if dx.abs() >= dy.abs() {
                AxisLock::Horizontal
            } else if session.origin_x < session.touchable_width as f32 / 2.0 {
                AxisLock::Vertical(Side::Left)
            } else {
                AxisLock::Vertical(Side::Right)
            };
            locked_now = true;
            debug!("Drag locked to {:?}", session.axis_lock);
        }

        let target = session.axis_lock.target()?;
        trace!("Routing delta ({}, {}) to {:?}", dx, dy, target);
        Some(RoutedDelta {
            target,
            locked_now,
            dx,
            dy,
            touchable_width: session.touchable_width,
            touchable_height: session.touchable_height,
        })
    }

    /// End the session. Returns the consumer to notify, if the drag locked.
    pub fn drag_stop(&mut self) -> Option<DragTarget> {
        let session = self.session.take()?;
        if !session.is_within_effective_region {
            return None;
        }
        session.axis_lock.target()
    }

    /// Abandon the session; same routing as [`Self::drag_stop`]
    pub fn drag_cancel(&mut self) -> Option<DragTarget> {
        self.drag_stop()
    }

    fn is_within_effective_region(&self, x: f32, y: f32, width: u32, height: u32) -> bool {
        let (width, height) = (width as f32, height as f32);
        let margin = self.edge_margin;
        x >= margin && x <= width - margin && y >= margin && y <= height - margin
    }
}
