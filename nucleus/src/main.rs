mod config;

use clap::Parser as _;
use log::{debug, info};

use nucleus::{
	output, rt, seat,
	virtual_desktop::{self, virtual_desktops},
	wl, Change, ClientId, Display, Rect, Result, Size,
};

#[derive(clap::Parser)]
struct Args {
	/// Socket name inside $XDG_RUNTIME_DIR.
	#[arg(short, long)]
	socket: Option<String>,

	#[arg(short, long)]
	config: Option<std::path::PathBuf>,

	#[arg(long)]
	width: Option<i32>,

	#[arg(long)]
	height: Option<i32>,
}

struct State {
	display: Display,
	next_desktop: u32,
}

impl State {
	fn new(config: &config::Config) -> Result<Self> {
		let mut display = Display::new();

		display.add_global(wl::Compositor)?;
		display.add_global(wl::SubCompositor)?;
		display.add_global(wl::DataDeviceManager)?;
		display.add_global(wl::ZwpPrimarySelectionDeviceManagerV1)?;
		display.add_global(wl::ZwpRelativePointerManagerV1)?;
		display.add_global(wl::ZwpPointerGesturesV1)?;
		display.add_global(wl::ZwpPointerConstraintsV1)?;

		seat::create_seat(
			&mut display,
			&config.seat,
			seat::Capabilities::POINTER | seat::Capabilities::TOUCH,
		)?;

		let x = &config.output;

		let mode = output::Mode {
			size: Size(x.width, x.height),
			refresh_rate: x.refresh_rate,
			preferred: true,
		};

		let state = output::OutputState {
			enabled: true,
			geometry: Rect::new(x.x, x.y, x.width, x.height),
			mode,
			subpixel: output::Subpixel::Unknown,
			transform: output::Transform::Normal,
			scale: x.scale,
			meta: output::Metadata {
				name: x.name.clone(),
				description: format!("{} {}", x.make, x.model),
				make: x.make.clone(),
				model: x.model.clone(),
				serial_number: String::new(),
				physical_size: Size(x.physical_width, x.physical_height),
			},
		};

		let output = output::create_output(&mut display, state, vec![mode])?;
		output::set_dpms_supported(&mut display, output, true)?;

		display.add_global(wl::ZwlrOutputManagerV1)?;
		display.add_global(wl::OrgKdeKwinDpmsManager)?;

		let mut ret = Self {
			display,
			next_desktop: 0,
		};

		virtual_desktop::create_management(&mut ret.display)?;

		for name in &config.desktops {
			ret.create_desktop(name, None)?;
		}

		virtual_desktop::set_rows(&mut ret.display, config.desktop_rows)?;
		virtual_desktop::send_done(&mut ret.display)?;

		// nothing is queued for anyone yet
		ret.display.take_changes();

		Ok(ret)
	}

	fn create_desktop(&mut self, name: &str, position: Option<u32>) -> Result<()> {
		self.next_desktop += 1;
		let id = format!("desktop-{}", self.next_desktop);

		virtual_desktop::create_desktop(&mut self.display, &id, position)?;
		virtual_desktop::set_desktop_name(&mut self.display, &id, name)?;

		if virtual_desktops(&self.display).active().is_none() {
			virtual_desktop::set_desktop_active(&mut self.display, &id, true)?;
		}

		virtual_desktop::send_desktop_done(&mut self.display, &id)
	}

	/// Makes `id` the only active desktop.
	fn activate_desktop(&mut self, id: &str) -> Result<()> {
		if virtual_desktops(&self.display).desktop(id).is_none() {
			debug!("ignoring activation of unknown desktop '{id}'");
			return Ok(());
		}

		let previous = virtual_desktops(&self.display).active().map(|x| x.id.clone());

		if previous.as_deref() == Some(id) {
			return Ok(());
		}

		if let Some(previous) = previous {
			virtual_desktop::set_desktop_active(&mut self.display, &previous, false)?;
			virtual_desktop::send_desktop_done(&mut self.display, &previous)?;
		}

		virtual_desktop::set_desktop_active(&mut self.display, id, true)?;
		virtual_desktop::send_desktop_done(&mut self.display, id)
	}

	fn remove_desktop(&mut self, id: &str) -> Result<()> {
		let desktops = virtual_desktops(&self.display);

		let Some(desktop) = desktops.desktop(id) else {
			debug!("ignoring removal of unknown desktop '{id}'");
			return Ok(());
		};

		if desktops.desktops().len() == 1 {
			debug!("keeping the last desktop '{id}'");
			return Ok(());
		}

		let was_active = desktop.active;
		virtual_desktop::remove_desktop(&mut self.display, id)?;

		if was_active {
			if let Some(first) = virtual_desktops(&self.display)
				.desktops()
				.first()
				.map(|x| x.id.clone())
			{
				self.activate_desktop(&first)?;
			}
		}

		Ok(())
	}

	/// The policy side of the server.
	fn apply_changes(&mut self) -> Result<()> {
		for change in self.display.take_changes() {
			match change {
				Change::DesktopCreateRequested { name, position } => {
					self.create_desktop(&name, Some(position))?;
					virtual_desktop::send_done(&mut self.display)?;
				}
				Change::DesktopRemoveRequested { id } => {
					self.remove_desktop(&id)?;
					virtual_desktop::send_done(&mut self.display)?;
				}
				Change::DesktopActivateRequested { id } => {
					self.activate_desktop(&id)?;
				}
				Change::DpmsModeRequested { output, mode } => {
					output::set_dpms_mode(&mut self.display, output, mode)?;
				}
				x => debug!("{x:?}"),
			}
		}

		Ok(())
	}

	fn finish(&mut self) -> Result<()> {
		self.apply_changes()?;
		self.display.finish_tick();
		self.display.flush_all()?;

		// a flush drops clients that stopped reading
		for client in self.display.clients() {
			self.drop_if_errored(client)?;
		}

		Ok(())
	}

	/// Flushes the error a client caused, then hangs up on it.
	fn drop_if_errored(&mut self, client: ClientId) -> Result<()> {
		let Some(x) = self.display.client(client) else {
			return Ok(());
		};

		if !x.is_errored() {
			return Ok(());
		}

		let connection = x.connection().cloned();

		self.display.flush(client)?;
		self.display.destroy_client(client)?;

		if let Some(connection) = connection {
			// the peer may already be gone
			if let Err(e) = connection.shutdown() {
				debug!("{client}: shutdown failed: {e}");
			}
		}

		Ok(())
	}
}

fn main() -> Result<()> {
	color_eyre::install()?;
	env_logger::init();

	let args = Args::parse();

	let mut config = config::Config::read(args.config.as_deref())?;

	if let Some(x) = args.socket {
		config.socket = x;
	}

	if let Some(x) = args.width {
		config.output.width = x;
	}

	if let Some(x) = args.height {
		config.output.height = x;
	}

	let runtime_dir = std::env::var("XDG_RUNTIME_DIR")?;
	let path = std::path::PathBuf::from_iter([runtime_dir, config.socket.clone()]);

	if path.exists() {
		std::fs::remove_file(&path)?;
	}

	let mut state = State::new(&config)?;

	let socket = std::os::unix::net::UnixListener::bind(&path)?;
	socket.set_nonblocking(true)?;

	info!("listening on {}", path.display());

	let mut runtime = rt::Runtime::new();

	runtime.on(
		rt::producers::UnixListener::new(socket),
		|stream, state: &mut State, runtime| {
			let connection = nucleus::Connection::new(stream);
			let client = state.display.get_or_create_client(connection.as_raw_fd());

			state.display.set_connection(client, connection.clone());

			runtime.on(
				rt::producers::Wl::new(connection),
				move |msg, state: &mut State, _| {
					match msg {
						rt::producers::WlMessage::Fds(fds) => state.display.push_fds(client, fds),
						rt::producers::WlMessage::Request { object, op, params } => {
							// requests already read from a client that was dropped
							if state.display.client(client).is_none() {
								return Ok(());
							}

							state.display.dispatch(client, object, op, params)?;
							state.drop_if_errored(client)?;
						}
						rt::producers::WlMessage::Closed => state.display.destroy_client(client)?,
					}

					state.finish()
				},
			);

			state.finish()
		},
	);

	runtime.run(&mut state)?;

	drop(runtime);
	std::fs::remove_file(path)?;

	Ok(())
}
