//! Thermostat
//!
//! This example drives a two-mode thermostat through a scripted session.
//!
//! Key concepts:
//! - Composite states (HEAT contains HEATING, COOL contains COOLING)
//! - Completion transitions guarded by domain data
//! - Internal transitions on the root for setters carrying a payload
//! - Terminating the machine from a transition effect
//!
//! Run with: cargo run --example thermostat
//! Engine logs: RUST_LOG=statechart=debug cargo run --example thermostat

use statechart::builder::{completion, internal, on_event, BuildError, StateBuilder, StateMachineBuilder};
use statechart::core::TransitionInfo;
use statechart::{event_enum, state_enum, Context, StateId, StateMachine, Trigger};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

state_enum! {
    enum Mode {
        PoweredOn = 1,
        SystemOff = 2,
        SystemHeat = 3,
        Heating = 4,
        SystemCool = 5,
        Cooling = 6,
    }
}

event_enum! {
    enum Command {
        SetOff = b'0',
        SetHeat = b'1',
        SetCool = b'2',
        SetTemperature = b'3',
        SetHeatSetpoint = b'4',
        SetCoolSetpoint = b'5',
        SetMinActiveTime = b'6',
        PowerOff = b'9',
    }
}

#[derive(Debug, Clone, Copy)]
enum Setting {
    Heat,
    Cool,
}

#[derive(Debug)]
struct ModeSettings {
    setpoint: f32,
    active_since: u64,
    minimum_active_time: f32,
    invert: bool,
}

#[derive(Debug)]
struct Thermostat {
    temperature: f32,
    heat: ModeSettings,
    cool: ModeSettings,
    current: Option<Setting>,
    /// Seconds since power on.
    clock: u64,
}

impl Thermostat {
    fn mode(&self) -> Option<&ModeSettings> {
        match self.current? {
            Setting::Heat => Some(&self.heat),
            Setting::Cool => Some(&self.cool),
        }
    }
}

type Ctx<'a> = Context<'a, Thermostat, f32>;
type Info<'a> = TransitionInfo<'a, f32>;

/// The room is on the wrong side of the active mode's setpoint.
fn demand(ctx: &Ctx<'_>, _: &Info<'_>) -> bool {
    let room = ctx.data();
    room.mode().is_some_and(|mode| {
        if mode.invert {
            room.temperature > mode.setpoint
        } else {
            room.temperature < mode.setpoint
        }
    })
}

fn ran_long_enough(ctx: &Ctx<'_>, _: &Info<'_>) -> bool {
    let room = ctx.data();
    room.mode()
        .is_some_and(|mode| (room.clock - mode.active_since) as f32 > mode.minimum_active_time)
}

fn satisfied(ctx: &Ctx<'_>, info: &Info<'_>) -> bool {
    ran_long_enough(ctx, info) && !demand(ctx, info)
}

fn label(id: StateId) -> &'static str {
    Mode::from_id(id).map_or("UNKNOWN", Mode::name)
}

fn log_entry(_: &mut Ctx<'_>, id: StateId, _: Option<&Trigger<f32>>) {
    println!("[THERMOSTAT] {} ENTRY", label(id));
}

fn log_exit(_: &mut Ctx<'_>, id: StateId, _: Option<&Trigger<f32>>) {
    println!("[THERMOSTAT] {} EXIT", label(id));
}

fn mode_entry(ctx: &mut Ctx<'_>, id: StateId, trigger: Option<&Trigger<f32>>) {
    log_entry(ctx, id, trigger);
    if let Some(setting) = ctx.state_data::<Setting>(id).copied() {
        let thermostat = ctx.data_mut();
        thermostat.current = Some(setting);
        let now = thermostat.clock;
        match setting {
            Setting::Heat => thermostat.heat.active_since = now,
            Setting::Cool => thermostat.cool.active_since = now,
        }
    }
}

fn log_effect(_: &mut Ctx<'_>, info: &Info<'_>) {
    let target = info.target.map_or("(none)", label);
    println!("[THERMOSTAT] {} -> {}", label(info.source), target);
}

fn power_off(ctx: &mut Ctx<'_>, info: &Info<'_>) {
    log_effect(ctx, info);
    ctx.terminate();
}

fn setter(apply: fn(&mut Thermostat, f32)) -> impl Fn(&mut Ctx<'_>, &Info<'_>) + Send + Sync {
    move |ctx: &mut Ctx<'_>, info: &Info<'_>| {
        if let Some(value) = info.trigger.payload {
            apply(ctx.data_mut(), value);
        }
    }
}

fn leaf(id: Mode) -> StateBuilder<Thermostat, f32> {
    StateBuilder::new(id).name(id.name()).on_entry(log_entry).on_exit(log_exit)
}

fn mode(id: Mode, setting: Setting, running: Mode) -> StateBuilder<Thermostat, f32> {
    StateBuilder::new(id)
        .name(id.name())
        .data(setting)
        .on_entry(mode_entry)
        .on_exit(log_exit)
        .child(leaf(running))
}

fn build() -> Result<StateMachine<Thermostat, f32>, BuildError> {
    let thermostat = Thermostat {
        temperature: 72.0,
        heat: ModeSettings {
            setpoint: 72.0,
            active_since: 0,
            minimum_active_time: 0.0,
            invert: false,
        },
        cool: ModeSettings {
            setpoint: 72.0,
            active_since: 0,
            minimum_active_time: 60.0,
            invert: true,
        },
        current: None,
        clock: 0,
    };

    StateMachineBuilder::new(thermostat)
        .name("thermostat")
        .root(
            leaf(Mode::PoweredOn)
                .initial(Mode::SystemOff)
                .child(leaf(Mode::SystemOff))
                .child(mode(Mode::SystemHeat, Setting::Heat, Mode::Heating))
                .child(mode(Mode::SystemCool, Setting::Cool, Mode::Cooling)),
        )
        .transition(on_event(Mode::SystemOff, Mode::SystemCool, Command::SetCool).effect(log_effect))?
        .transition(on_event(Mode::SystemCool, Mode::SystemOff, Command::SetOff).when(ran_long_enough))?
        .transition(on_event(Mode::SystemCool, Mode::SystemHeat, Command::SetHeat).when(ran_long_enough))?
        .transition(on_event(Mode::SystemOff, Mode::SystemHeat, Command::SetHeat).effect(log_effect))?
        .transition(on_event(Mode::SystemHeat, Mode::SystemCool, Command::SetCool).effect(log_effect))?
        .transition(on_event(Mode::SystemHeat, Mode::SystemOff, Command::SetOff).effect(log_effect))?
        .transition(internal(Mode::PoweredOn, Command::PowerOff, power_off))?
        .transition(completion(Mode::Cooling, Mode::SystemCool, satisfied))?
        .transition(completion(Mode::Heating, Mode::SystemHeat, satisfied))?
        .transition(completion(Mode::SystemCool, Mode::Cooling, demand))?
        .transition(completion(Mode::SystemHeat, Mode::Heating, demand))?
        .transition(internal(
            Mode::PoweredOn,
            Command::SetTemperature,
            setter(|t, value| t.temperature = value),
        ))?
        .transition(internal(
            Mode::PoweredOn,
            Command::SetHeatSetpoint,
            setter(|t, value| t.heat.setpoint = value),
        ))?
        .transition(internal(
            Mode::PoweredOn,
            Command::SetCoolSetpoint,
            setter(|t, value| t.cool.setpoint = value),
        ))?
        .transition(internal(
            Mode::PoweredOn,
            Command::SetMinActiveTime,
            setter(|t, value| t.cool.minimum_active_time = value),
        ))?
        .build()
}

/// Advance the simulated room by `seconds`, stepping the machine each second.
fn run_for(machine: &mut StateMachine<Thermostat, f32>, seconds: u64) {
    for _ in 0..seconds {
        let running = machine.active_state().and_then(Mode::from_id);
        let room = machine.data_mut();
        room.clock += 1;
        match running {
            Some(Mode::Heating) => room.temperature += 0.5,
            Some(Mode::Cooling) => room.temperature -= 0.5,
            _ => {}
        }
        machine.step();
    }
}

fn report(machine: &StateMachine<Thermostat, f32>) {
    let mode = machine
        .active_state()
        .and_then(Mode::from_id)
        .map_or("POWERED OFF", Mode::name);
    let room = machine.data();
    println!(
        "  [t={:>3}s] mode: {:<10} temperature: {:.1} (heat {:.1}, cool {:.1})",
        room.clock, mode, room.temperature, room.heat.setpoint, room.cool.setpoint
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();

    println!("=== Thermostat ===\n");
    let mut machine = build()?;
    machine.init()?;
    report(&machine);

    let script: [(Command, Option<f32>, u64); 9] = [
        (Command::SetHeat, None, 1),
        (Command::SetTemperature, Some(68.0), 10),
        (Command::SetHeatSetpoint, Some(70.0), 2),
        (Command::SetMinActiveTime, Some(5.0), 0),
        (Command::SetCool, None, 1),
        (Command::SetTemperature, Some(76.0), 10),
        (Command::SetOff, None, 1),
        (Command::SetCoolSetpoint, Some(74.0), 1),
        (Command::PowerOff, None, 0),
    ];

    for (command, payload, seconds) in script {
        println!("\n> {} {}", command.name(), payload.map_or(String::new(), |v| v.to_string()));
        match payload {
            Some(value) => machine.dispatch_with(command, value),
            None => machine.dispatch(command),
        };
        run_for(&mut machine, seconds);
        report(&machine);
    }

    println!("\n=== Transition history ===");
    for record in machine.history().records() {
        println!(
            "  pass {:>3}: {} -> {} ({}, {:?})",
            record.pass,
            label(record.source),
            record.target.map_or("(none)", label),
            record.kind,
            record.cause
        );
    }
    Ok(())
}
