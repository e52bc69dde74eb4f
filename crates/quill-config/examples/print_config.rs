/// Example program to print the loaded configuration
///
/// Run with: cargo run -p quill-config --example print_config

fn main() {
    // Load configuration from quill.toml plus QUILL_* overrides
    let config = quill_config::QuillConfig::load();

    println!("=== Quill Configuration ===\n");

    println!("Editor Settings:");
    println!("  Font: {} @ {}pt", config.editor.font_face, config.editor.font_size);
    println!("  Tab Size: {}", config.editor.tab_size);
    println!("  Spaces For Tabs: {}", config.editor.use_spaces_for_tabs);
    println!("  Visible Whitespace: {}", config.editor.visible_whitespace);
    println!("  Wrap: {:?}", config.editor.wrap);
    println!("  Read Only: {}", config.editor.read_only);
    println!();

    println!("Lexer Settings:");
    println!("  Language: {}", config.lexer.language);
    for set in &config.lexer.keywords {
        println!("  Keywords[{}]: {}", set.index, set.words);
    }
    println!();

    println!("Display Settings:");
    println!("  DPI: {}", config.display.dpi);
    println!("  Monitor: {}x{}", config.display.width, config.display.height);
    println!();

    println!("Clipboard Settings:");
    println!("  Probe Size: {}", config.clipboard.probe_size);
    println!("  Refetch Full Length: {}", config.clipboard.refetch_full_length);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
