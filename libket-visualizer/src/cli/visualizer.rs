pub trait Visualizer {
    fn export(&self) -> String;
}
