// Resolution generation engine.
// Flow: placeholders → clauses → composer → format (docx / html) → OutputStore,
// driven per trainee by the renderer and per selection by the batch orchestrator.

pub mod archive;
pub mod batch;
pub mod clauses;
pub mod composer;
pub mod document;
pub mod docx;
pub mod format;
pub mod handlers;
pub mod html;
pub mod placeholders;
pub mod profile;
pub mod renderer;
pub mod summary;
pub mod workflow;
