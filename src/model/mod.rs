pub mod track;
pub mod view;
