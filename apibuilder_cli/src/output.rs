use apibuilder::transport::RawResponse;

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

pub fn print_raw(response: &RawResponse) {
    println!("HTTP {}", response.status());
    if let Some(content_type) = response.content_type() {
        println!("content-type: {}", content_type);
    }
    println!();
    println!("{}", response.text());
}
