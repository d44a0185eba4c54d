mod loader;
mod settings;
