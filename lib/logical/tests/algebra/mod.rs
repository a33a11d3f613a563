mod compiler;
mod variables;
