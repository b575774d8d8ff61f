pub mod agent;
pub mod camera;
pub mod config;
pub mod error;
pub mod game;
pub mod generation;
pub mod geometry;
pub mod hud;
pub mod input;
pub mod player;
pub mod population;
pub mod render;
pub mod session;
pub mod shop;
pub mod species;
pub mod world;
