#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

use esp_backtrace as _;
use esp_hal::{efuse::Efuse, timer::timg::TimerGroup};
use esp_println::logger::init_logger;

use esp32_dht_mqtt::{
    config::{Security, CONFIG},
    constants::{HEARTBEAT_INTERVAL_SECS, VERSION},
    DeviceId,
};

esp_bootloader_esp_idf::esp_app_desc!();

#[esp_hal_embassy::main]
async fn main(_spawner: Spawner) {
    init_logger(log::LevelFilter::Info);

    let peripherals = esp_hal::init(esp_hal::Config::default());

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_hal_embassy::init(timg0.timer0);

    log::info!("Firmware {} starting", VERSION);

    // Nothing may run on a record that fails its checks
    if let Err(e) = CONFIG.validate() {
        panic!("Invalid configuration: {}", e);
    }
    CONFIG.log_summary();

    let device_id = DeviceId::from_mac(Efuse::read_base_mac_address());
    match CONFIG.publish_topic(&device_id) {
        Ok(topic) => log::info!("Publishing to {}", topic),
        Err(e) => panic!("Cannot build publish topic for {}: {}", device_id, e),
    }

    let profile = CONFIG.sensor_type().profile();
    log::info!(
        "{} sampled at most every {} ms, TLS port {}",
        CONFIG.sensor_type(),
        profile.min_sample_interval_ms,
        CONFIG.broker_port_for(Security::Tls)
    );

    loop {
        Timer::after(Duration::from_secs(HEARTBEAT_INTERVAL_SECS)).await;
        log::debug!("Configuration loaded, {} access point(s)", CONFIG.access_point_count());
    }
}
