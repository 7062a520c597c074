mod broken;
mod errors;
mod samples;
