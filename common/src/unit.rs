//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing a rental period start.
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// Marker type describing a rental period end.
#[derive(Clone, Copy, Debug)]
pub struct End;
