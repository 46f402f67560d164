pub mod track_point;
