pub mod mesh;
pub mod renderer;
pub mod surface;
pub mod texture;

#[cfg(test)]
pub mod recording;
