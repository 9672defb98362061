//! Emulator hub integration tests.

#[cfg(test)]
mod tests {
    use fq_core::EmulatorHub;

    use crate::emulator_config;

    #[tokio::test]
    #[ignore = "requires running emulator with functions"]
    async fn test_should_toggle_background_triggers() {
        let config = emulator_config();
        let host = config.emulator_hub.expect("demo project has a hub");
        let hub = EmulatorHub::new(&host);

        hub.disable_background_triggers()
            .await
            .expect("disable triggers");
        hub.enable_background_triggers()
            .await
            .expect("enable triggers");
    }
}
