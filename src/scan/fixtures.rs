//! Components registered for the scanner tests

use crate::Component;
use crate::capability;

pub trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

capability!(pub static GREETER for Greeter);

pub trait LoudGreeter: Greeter {
    fn shout(&self) -> String;
}

capability!(pub static LOUD_GREETER for LoudGreeter: [Greeter]);

#[derive(Default, Component)]
#[component(provides(Greeter))]
pub struct English;

impl Greeter for English {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

#[derive(Default, Component)]
#[component(provides(LoudGreeter))]
pub struct Pirate;

impl Greeter for Pirate {
    fn greet(&self) -> String {
        "ahoy".to_string()
    }
}

impl LoudGreeter for Pirate {
    fn shout(&self) -> String {
        self.greet().to_uppercase()
    }
}

#[derive(Component)]
#[component(provides(Greeter), kind = "abstract")]
pub struct BaseGreeter;

impl Greeter for BaseGreeter {
    fn greet(&self) -> String {
        String::new()
    }
}

#[derive(Default, Component)]
pub struct Unrelated;

#[derive(Component)]
#[component(provides(Greeter), constructor = "Broken::connect")]
pub struct Broken;

impl Broken {
    fn connect() -> anyhow::Result<Self> {
        anyhow::bail!("missing credentials")
    }
}

impl Greeter for Broken {
    fn greet(&self) -> String {
        String::new()
    }
}

#[derive(Component)]
#[component(provides(Greeter), constructor = "Exploding::create")]
pub struct Exploding;

impl Exploding {
    fn create() -> anyhow::Result<Self> {
        panic!("boom")
    }
}

impl Greeter for Exploding {
    fn greet(&self) -> String {
        String::new()
    }
}

pub mod nested {
    use super::Greeter;
    use crate::Component;

    #[derive(Default, Component)]
    #[component(provides(Greeter))]
    pub struct Spanish;

    impl Greeter for Spanish {
        fn greet(&self) -> String {
            "hola".to_string()
        }
    }
}
