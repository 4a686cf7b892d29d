pub mod apply_points;
