mod caller_site;
mod cli;
mod file_sink;
mod session_block;
