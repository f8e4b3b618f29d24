mod interactive;
mod pipeline;
mod properties;
