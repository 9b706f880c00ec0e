// Native binary for pg-portal - command-line API client

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;

use pg_portal::{
    ajax::Response,
    api::{ApiClient, ApiReply, DeviceRegisterData, Empty, LoginInput, RegisterDeviceInput},
    config::{load, CliArgs, CliConfig, Command},
    error::Failure,
    net::ReqwestTransport,
    platform::init_logging,
};

type Outcome<D> = Rc<RefCell<Option<Result<ApiReply<D>, Failure>>>>;

/// Run one API call to completion. The reqwest transport answers before
/// `send` returns, so the slot is filled by the time `op` is done.
fn blocking<D: 'static>(
    op: impl FnOnce(Box<dyn FnOnce(ApiReply<D>)>, Box<dyn FnOnce(&Response)>),
) -> Result<ApiReply<D>> {
    let slot: Outcome<D> = Rc::new(RefCell::new(None));
    let (ok, err) = (slot.clone(), slot.clone());
    op(
        Box::new(move |reply| *ok.borrow_mut() = Some(Ok(reply))),
        Box::new(move |resp: &Response| {
            *err.borrow_mut() = Some(Err(Failure::from_response(resp)))
        }),
    );
    let outcome = slot.borrow_mut().take();
    match outcome {
        Some(Ok(reply)) => Ok(reply),
        Some(Err(failure)) => Err(anyhow!(failure)),
        None => bail!("request did not complete"),
    }
}

fn report(what: &str, reply: &ApiReply<Empty>) {
    if reply.message().is_empty() {
        println!("{what}: ok ({})", reply.status);
    } else {
        println!("{what}: {} ({})", reply.message(), reply.status);
    }
}

fn login(api: &ApiClient<ReqwestTransport>, cfg: &CliConfig) -> Result<bool> {
    let (Some(username), Some(password)) = (&cfg.username, &cfg.password) else {
        return Ok(false);
    };
    let input = LoginInput {
        username: username.clone(),
        password: password.clone(),
    };
    blocking::<Empty>(|ok, err| api.login(&input, ok, err)).context("login failed")?;
    log::info!("logged in as {username}");
    Ok(true)
}

fn run(api: &ApiClient<ReqwestTransport>, cfg: &CliConfig) -> Result<()> {
    let logged_in = login(api, cfg)?;

    match &cfg.command {
        Command::Login => {
            if !logged_in {
                bail!("login needs --username and --password");
            }
            println!("login: ok");
        }
        Command::Register {
            owner,
            mac,
            description,
            platform,
        } => {
            let username = owner
                .clone()
                .or_else(|| cfg.username.clone())
                .context("register needs --owner or --username")?;
            let input = RegisterDeviceInput {
                username,
                mac_address: mac.clone().unwrap_or_default(),
                description: description.clone(),
                platform: (!platform.is_empty()).then(|| platform.clone()),
            };
            let reply = blocking::<DeviceRegisterData>(|ok, err| {
                api.register_device(&input, ok, err)
            })?;
            match reply.data() {
                Some(data) if !data.location.is_empty() => {
                    println!("register: ok, see {}", data.location)
                }
                _ => println!("register: ok ({})", reply.status),
            }
        }
        Command::DeleteDevices { owner, macs } => {
            let reply = blocking::<Empty>(|ok, err| api.delete_devices(owner, macs, ok, err))?;
            report("delete-devices", &reply);
        }
        Command::Reassign { new_owner, macs } => {
            let reply = blocking::<Empty>(|ok, err| {
                api.reassign_devices(new_owner, macs, ok, err)
            })?;
            report("reassign", &reply);
        }
        Command::Describe { mac, description } => {
            let reply = blocking::<Empty>(|ok, err| {
                api.save_device_description(mac, description, ok, err)
            })?;
            report("describe", &reply);
        }
        Command::Flag { mac, off } => {
            let reply = blocking::<Empty>(|ok, err| api.flag_device(mac, !off, ok, err))?;
            report(if *off { "unflag" } else { "flag" }, &reply);
        }
        Command::BlacklistUser { username } => {
            let reply = blocking::<Empty>(|ok, err| api.blacklist_user(username, ok, err))?;
            report("blacklist-user", &reply);
        }
        Command::UnblacklistUser { username } => {
            let reply = blocking::<Empty>(|ok, err| api.unblacklist_user(username, ok, err))?;
            report("unblacklist-user", &reply);
        }
        Command::BlacklistDevices { macs } => {
            let reply = blocking::<Empty>(|ok, err| api.blacklist_devices(macs, ok, err))?;
            report("blacklist-devices", &reply);
        }
        Command::UnblacklistDevices { macs } => {
            let reply = blocking::<Empty>(|ok, err| api.unblacklist_devices(macs, ok, err))?;
            report("unblacklist-devices", &reply);
        }
        Command::DeleteUser { username } => {
            let reply = blocking::<Empty>(|ok, err| api.delete_user(username, ok, err))?;
            report("delete-user", &reply);
        }
    }

    if logged_in && cfg.command != Command::Login {
        if let Err(e) = blocking::<Empty>(|ok, err| api.logout(ok, err)) {
            log::warn!("logout failed: {e:#}");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();
    init_logging(log::Level::Warn);

    let cfg = load(CliArgs::parse()).context("Failed to load configuration")?;
    if log::log_enabled!(log::Level::Debug) {
        cfg.print_summary();
    }

    let transport = ReqwestTransport::new(&cfg.base_url, cfg.timeout_ms)?;
    let api = ApiClient::new(Rc::new(transport));
    run(&api, &cfg)
}
