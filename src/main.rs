use std::path::{Path, PathBuf};

use log::{error, info};

use pokitto_emu::config::{CONFIG_FILE, HarnessConfig};
use pokitto_emu::context::EmuContext;
use pokitto_emu::display::FrameSink;
use pokitto_emu::driver::ExecutionDriver;
use pokitto_emu::eeprom::NonVolatileStore;
use pokitto_emu::error::HarnessError;
use pokitto_emu::gpio::PinBank;
use pokitto_emu::machine::{IdleCpu, IdleTimers};
use pokitto_emu::{rom, sdl};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let code = match run() {
        Ok(()) => 0,
        Err(e) => {
            error!("{}", e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run() -> Result<(), HarnessError> {
    let config = HarnessConfig::load(Path::new(CONFIG_FILE));

    // Only argument: the flash image.
    let rom_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.default_rom.clone());

    let mut ctx = EmuContext::new();
    rom::load_flash(&rom_path, &mut ctx.flash)?;

    let store = NonVolatileStore::new(config.eeprom_path_for(&rom_path));
    if !store.load(&mut ctx.eeprom) {
        info!("no saved EEPROM at {}, starting blank", store.path().display());
    }

    let (surface, mut events) = sdl::init(&config.title, config.scale)?;
    let mut sink = FrameSink::new(surface);

    let mut driver = ExecutionDriver::new(
        IdleCpu,
        IdleTimers::default(),
        PinBank::new(),
        config.budget(),
    );
    driver.reset(&mut ctx);

    let result = driver.run(&mut ctx, &mut events, &mut sink);
    store.save(&mut ctx.eeprom);
    result?;
    Ok(())
}
