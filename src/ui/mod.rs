pub mod gazetteer;
pub mod panels;
pub mod plot;
pub mod surface;
pub mod theme;
