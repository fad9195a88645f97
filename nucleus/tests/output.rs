mod common;

use common::{ops, TestClient};
use nucleus::{
	output::{self, DpmsMode, Mode, OutputKey, OutputState},
	wl, Change, Display, Point, Rect, Size,
};

fn setup() -> (Display, OutputKey) {
	let mut display = Display::new();

	let mode = Mode {
		size: Size(1920, 1080),
		refresh_rate: 60000,
		preferred: true,
	};

	let state = OutputState {
		enabled: true,
		geometry: Rect::new(0, 0, 1920, 1080),
		mode,
		meta: output::Metadata {
			name: String::from("HEADLESS-1"),
			make: String::from("nucleus"),
			model: String::from("headless"),
			physical_size: Size(530, 300),
			..Default::default()
		},
		..Default::default()
	};

	let key = output::create_output(&mut display, state, vec![mode]).unwrap();
	display.add_global(wl::ZwlrOutputManagerV1).unwrap();
	display.add_global(wl::OrgKdeKwinDpmsManager).unwrap();

	(display, key)
}

#[test]
fn bind_sends_the_full_state() {
	let (mut display, _) = setup();

	let mut client = TestClient::connect(&mut display);
	let output = client.bind(&mut display, "wl_output", 3);

	let events = client.events(&mut display);
	assert_eq!(ops(&events, output), [0, 1, 3, 2]);

	let mode = events.iter().find(|x| x.object == output && x.op == 1).unwrap();
	assert_eq!(mode.decode::<(u32, i32, i32, i32)>(), (3, 1920, 1080, 60000));

	let scale = events.iter().find(|x| x.object == output && x.op == 3).unwrap();
	assert_eq!(scale.decode::<i32>(), 1);
}

#[test]
fn unchanged_state_sends_nothing() {
	let (mut display, key) = setup();

	let mut client = TestClient::connect(&mut display);
	let output = client.bind(&mut display, "wl_output", 3);
	let manager = client.bind(&mut display, "zwlr_output_manager_v1", 2);
	client.events(&mut display);

	output::broadcast_output(&mut display, key).unwrap();

	let events = client.events(&mut display);
	assert!(ops(&events, output).is_empty());
	assert!(ops(&events, manager).is_empty());
}

#[test]
fn logical_size_change_only_rescales() {
	let (mut display, key) = setup();

	let mut client = TestClient::connect(&mut display);
	let output = client.bind(&mut display, "wl_output", 3);
	client.events(&mut display);

	output::pending_mut(&mut display, key).unwrap().geometry.size = Size(960, 540);
	output::broadcast_output(&mut display, key).unwrap();

	let events = client.events(&mut display);
	assert_eq!(ops(&events, output), [3, 2]);

	let scale = events.iter().find(|x| x.object == output && x.op == 3).unwrap();
	assert_eq!(scale.decode::<i32>(), 2);

	// a later bind starts from the published state
	let mut late = TestClient::connect(&mut display);
	let output = late.bind(&mut display, "wl_output", 3);

	let events = late.events(&mut display);
	assert_eq!(ops(&events, output), [0, 1, 3, 2]);

	let scale = events.iter().find(|x| x.object == output && x.op == 3).unwrap();
	assert_eq!(scale.decode::<i32>(), 2);
}

#[test]
fn heads_follow_the_output() {
	let (mut display, key) = setup();

	let mut client = TestClient::connect(&mut display);
	let manager = client.bind(&mut display, "zwlr_output_manager_v1", 2);

	let events = client.events(&mut display);
	assert_eq!(ops(&events, manager), [0, 1]);

	let head = events[0].decode::<u32>();
	let head_ops = ops(&events, head);
	assert_eq!(head_ops[..2], [0, 1]);
	assert!(head_ops.contains(&4));

	output::pending_mut(&mut display, key).unwrap().geometry.position = Point(100, 0);
	output::broadcast_output(&mut display, key).unwrap();

	let events = client.events(&mut display);
	assert_eq!(ops(&events, head), [6]);
	assert_eq!(ops(&events, manager), [1]);

	let position = events.iter().find(|x| x.object == head).unwrap();
	assert_eq!(position.decode::<(i32, i32)>(), (100, 0));

	// configuring is refused
	let configuration = client.new_id();
	client.request(&mut display, manager, 0, (configuration, 0u32));
	assert_eq!(ops(&client.events(&mut display), configuration), [2]);
}

#[test]
fn removed_output_finishes_heads_and_goes_inert() {
	let (mut display, key) = setup();

	let mut client = TestClient::connect(&mut display);
	let output = client.bind(&mut display, "wl_output", 3);
	let manager = client.bind(&mut display, "zwlr_output_manager_v1", 2);

	let head = client.events(&mut display)
		.iter()
		.find(|x| x.object == manager && x.op == 0)
		.map(|x| x.decode::<u32>())
		.unwrap();

	output::remove_output(&mut display, key).unwrap();

	let events = client.events(&mut display);
	assert_eq!(ops(&events, head), [9]);
	assert_eq!(ops(&events, manager), [1]);
	assert_eq!(ops(&events, client.registry), [1]);

	let handle = display.lookup::<wl::Output>(client.id, output).unwrap();
	assert!(display.is_inert(handle));
	assert!(display.lookup::<wl::ZwlrOutputHeadV1>(client.id, head).is_err());

	// release still works on the inert object
	client.request(&mut display, output, 0, ());
	assert!(display.lookup::<wl::Output>(client.id, output).is_err());
}

#[test]
fn dpms_requests_go_to_policy() {
	let (mut display, key) = setup();
	output::set_dpms_supported(&mut display, key, true).unwrap();

	let mut client = TestClient::connect(&mut display);
	let output = client.bind(&mut display, "wl_output", 3);
	let manager = client.bind(&mut display, "org_kde_kwin_dpms_manager", 1);
	client.events(&mut display);

	let dpms = client.new_id();
	client.request(&mut display, manager, 0, (dpms, output));

	let events = client.events(&mut display);
	assert_eq!(ops(&events, dpms), [0, 1, 2]);

	display.take_changes();
	client.request(&mut display, dpms, 0, DpmsMode::Off as u32);

	// nothing changes until the compositor says so
	assert!(ops(&client.events(&mut display), dpms).is_empty());
	assert_eq!(
		display.take_changes(),
		[Change::DpmsModeRequested {
			output: key,
			mode: DpmsMode::Off
		}]
	);

	output::set_dpms_mode(&mut display, key, DpmsMode::Off).unwrap();

	let events = client.events(&mut display);
	assert_eq!(ops(&events, dpms), [1, 2]);
	assert_eq!(events[0].decode::<u32>(), DpmsMode::Off as u32);
}
