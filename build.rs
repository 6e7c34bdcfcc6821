use shadow_rs::ShadowBuilder;

fn main() {
    // Build metadata backs `--version` on the notifier-client binary
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
