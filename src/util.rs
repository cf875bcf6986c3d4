pub fn error(line: u32, message: &str) {
    println!("[line {}] Error: {}", line, message);
}
