use shadow_rs::ShadowBuilder;

fn main() {
    // Generate build metadata for package name and version information
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
