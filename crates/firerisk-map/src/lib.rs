//! Choropleth map rendering.
//!
//! A render always starts from [`view::create_base_map`], a fixed view of the
//! Montreal grid area, and adds overlays on top:
//!
//! - [`choropleth::overlay`] draws one risk layer, colored by
//!   [`choropleth::ColorScale`]
//! - [`choropleth::overlay_grid`] draws the bare grid for orientation
//!
//! [`view::MapView::to_html`] turns the result into a standalone Leaflet page.

pub mod choropleth;
pub mod html;
pub mod layer;
pub mod view;
