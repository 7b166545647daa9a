mod common;
mod jobs;
mod matching;
