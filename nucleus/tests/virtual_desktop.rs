mod common;

use common::{ops, TestClient};
use nucleus::{
	virtual_desktop::{self, virtual_desktops},
	wl, Change, Display,
};

const MANAGEMENT: &str = "org_kde_plasma_virtual_desktop_management";

fn created(events: &[common::Event], management: u32) -> Vec<(String, u32)> {
	events
		.iter()
		.filter(|x| x.object == management && x.op == 0)
		.map(|x| x.decode())
		.collect()
}

fn setup() -> Display {
	let mut display = Display::new();
	virtual_desktop::create_management(&mut display).unwrap();

	virtual_desktop::create_desktop(&mut display, "a", None).unwrap();
	virtual_desktop::create_desktop(&mut display, "b", None).unwrap();
	virtual_desktop::set_desktop_name(&mut display, "a", "Desktop 1").unwrap();
	virtual_desktop::set_desktop_active(&mut display, "a", true).unwrap();
	virtual_desktop::set_rows(&mut display, 1).unwrap();

	display
}

#[test]
fn every_client_sees_the_same_order() {
	let mut display = setup();

	let mut first = TestClient::connect(&mut display);
	let management = first.bind(&mut display, MANAGEMENT, 2);

	let events = first.events(&mut display);
	assert_eq!(
		created(&events, management),
		[(String::from("a"), 0), (String::from("b"), 1)]
	);
	assert_eq!(ops(&events, management), [0, 0, 3, 2]);

	virtual_desktop::create_desktop(&mut display, "c", Some(1)).unwrap();
	virtual_desktop::send_done(&mut display).unwrap();

	let events = first.events(&mut display);
	assert_eq!(created(&events, management), [(String::from("c"), 1)]);
	assert_eq!(ops(&events, management), [0, 2]);

	let mut second = TestClient::connect(&mut display);
	let management = second.bind(&mut display, MANAGEMENT, 2);

	assert_eq!(
		created(&second.events(&mut display), management),
		[
			(String::from("a"), 0),
			(String::from("c"), 1),
			(String::from("b"), 2)
		]
	);
}

#[test]
fn desktop_objects_track_their_desktop() {
	let mut display = setup();

	let mut client = TestClient::connect(&mut display);
	let management = client.bind(&mut display, MANAGEMENT, 2);
	client.events(&mut display);

	let a = client.new_id();
	client.request(&mut display, management, 0, (a, "a"));

	let events = client.events(&mut display);
	assert_eq!(ops(&events, a), [0, 1, 2, 4]);
	assert_eq!(events[1].decode::<String>(), "Desktop 1");

	let b = client.new_id();
	client.request(&mut display, management, 0, (b, "b"));
	client.events(&mut display);

	virtual_desktop::set_desktop_active(&mut display, "a", false).unwrap();
	virtual_desktop::set_desktop_active(&mut display, "b", true).unwrap();
	virtual_desktop::send_desktop_done(&mut display, "b").unwrap();

	let events = client.events(&mut display);
	assert_eq!(ops(&events, a), [3]);
	assert_eq!(ops(&events, b), [2, 4]);

	virtual_desktop::remove_desktop(&mut display, "a").unwrap();

	let events = client.events(&mut display);
	assert_eq!(ops(&events, a), [5]);
	assert_eq!(ops(&events, management), [1]);

	let handle = display
		.lookup::<wl::OrgKdePlasmaVirtualDesktop>(client.id, a)
		.unwrap();
	assert!(display.is_inert(handle));
	assert_eq!(virtual_desktops(&display).desktops().len(), 1);
}

#[test]
fn unknown_desktop_gives_an_inert_object() {
	let mut display = setup();

	let mut client = TestClient::connect(&mut display);
	let management = client.bind(&mut display, MANAGEMENT, 2);
	client.events(&mut display);

	let object = client.new_id();
	client.request(&mut display, management, 0, (object, "missing"));

	assert!(ops(&client.events(&mut display), object).is_empty());

	let handle = display
		.lookup::<wl::OrgKdePlasmaVirtualDesktop>(client.id, object)
		.unwrap();
	assert!(display.is_inert(handle));
	assert!(client.protocol_error(&mut display).is_none());
}

#[test]
fn client_requests_only_reach_policy() {
	let mut display = setup();

	let mut client = TestClient::connect(&mut display);
	let management = client.bind(&mut display, MANAGEMENT, 2);

	let b = client.new_id();
	client.request(&mut display, management, 0, (b, "b"));
	client.events(&mut display);
	display.take_changes();

	client.request(&mut display, management, 1, ("Desktop 3", 99u32));
	client.request(&mut display, management, 2, "a");
	client.request(&mut display, b, 0, ());

	assert_eq!(
		display.take_changes(),
		[
			Change::DesktopCreateRequested {
				name: String::from("Desktop 3"),
				position: 2
			},
			Change::DesktopRemoveRequested {
				id: String::from("a")
			},
			Change::DesktopActivateRequested {
				id: String::from("b")
			},
		]
	);

	assert_eq!(virtual_desktops(&display).desktops().len(), 2);
	assert!(ops(&client.events(&mut display), management).is_empty());
}

#[test]
fn removal_keeps_the_remaining_order_everywhere() {
	let mut display = Display::new();
	virtual_desktop::create_management(&mut display).unwrap();

	let mut first = TestClient::connect(&mut display);
	let first_management = first.bind(&mut display, MANAGEMENT, 2);

	for id in ["0-1", "0-2", "0-3"] {
		virtual_desktop::create_desktop(&mut display, id, None).unwrap();
	}

	virtual_desktop::send_done(&mut display).unwrap();

	let mut second = TestClient::connect(&mut display);
	let second_management = second.bind(&mut display, MANAGEMENT, 2);

	let expected = [
		(String::from("0-1"), 0),
		(String::from("0-2"), 1),
		(String::from("0-3"), 2),
	];

	assert_eq!(created(&first.events(&mut display), first_management), expected);
	assert_eq!(created(&second.events(&mut display), second_management), expected);

	virtual_desktop::remove_desktop(&mut display, "0-1").unwrap();
	virtual_desktop::send_done(&mut display).unwrap();

	for (client, management) in [(&mut first, first_management), (&mut second, second_management)] {
		let events = client.events(&mut display);
		assert_eq!(ops(&events, management), [1, 2]);
		assert_eq!(events[0].decode::<String>(), "0-1");
	}

	let ids = virtual_desktops(&display)
		.desktops()
		.iter()
		.map(|x| x.id.as_str())
		.collect::<Vec<_>>();
	assert_eq!(ids, ["0-2", "0-3"]);
}
