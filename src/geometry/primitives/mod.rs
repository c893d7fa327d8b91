pub mod box3;
pub mod line3;
pub mod line_segment3;
pub mod plane3;
pub mod triangle3;
