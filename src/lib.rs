//! Fridge Chef: photograph the fridge, get recipes, cook along by voice.
//!
//! | Module       | Concern                                               |
//! |--------------|-------------------------------------------------------|
//! | [`analysis`] | Gemini request, prompt/schema, response validation    |
//! | [`app`]      | egui front end                                        |
//! | [`camera`]   | Camera capability and the still-image device          |
//! | [`config`]   | `settings.toml` persistence and platform paths        |
//! | [`recipe`]   | Recipe data model and the dietary filter              |
//! | [`session`]  | Screens, shared state, state machine and runner       |
//! | [`voice`]    | Step narration over a speech device                   |

pub mod analysis;
pub mod app;
pub mod camera;
pub mod config;
pub mod recipe;
pub mod session;
pub mod voice;
