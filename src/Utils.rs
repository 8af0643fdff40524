//! different utility modules used throughout the project
/// tiny module to set up console and file logging (simplelog)
pub mod logger;
/// parse task document with structure like "title1 \n key1: value1, value2 \n key2: value2 \n title2 ..." into HashMap
/// and build an integration task from it
pub mod task_parser;
