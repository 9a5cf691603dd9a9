//! Max the dog: a code-defined persona that greets you when you come home.
//!
//! Run with `cargo run --example dog`. Set `RUST_LOG=warn` to see the
//! warning for the concept Max doesn't understand.

use persona_engine::core::persona::Persona;
use persona_engine::core::vocabulary::Vocabulary;
use persona_engine::schema::params::Params;

fn dog() -> Vocabulary {
    Vocabulary::new()
        .with("greet", |s| s.choose(["woof", "bark", "sniff sniff", "wag tail"]))
        .with("master", |s| {
            let name = s.param("name");
            let name = s.capitalize(name);
            s.if_else("name", name, "bringer of food")
        })
        .with("emoji", |s| s.cycle("emoji", ["👅", "🐶", "🐾", "💩", "🐩"]))
        // Cross-references greet, master and emoji.
        .with("welcome_home", |s| {
            format!(
                "{}! Welcome home, {}! {}",
                s.cap_say("greet"),
                s.say("master"),
                s.say("emoji")
            )
        })
}

fn main() {
    env_logger::init();

    let mut max = Persona::builder()
        .name("max")
        .with_vocabulary(dog())
        .build()
        .expect("code-defined vocabulary needs no files");

    // e.g. "Sniff sniff! Welcome home, bringer of food! 🐾"
    println!("{}", max.articulate("welcome_home"));

    // "woof", "bark", "sniff sniff" or "wag tail"
    println!("{}", max.articulate("greet"));

    // Unknown concepts come back empty, with a logged warning.
    println!("{:?}", max.articulate("meow"));

    let justin = || Params::new().with("name", "justin");
    // "Justin"
    println!("{}", max.articulate_with("master", justin()));
    // e.g. "Wag tail! Welcome home, Justin! 🐩"
    println!("{}", max.articulate_with("welcome_home", justin()));
    // "bringer of food"
    println!("{}", max.articulate("master"));

    // Six emoji in a row: the first five never repeat.
    let emoji: Vec<String> = (0..6).map(|_| max.articulate("emoji")).collect();
    println!("{}", emoji.join(" "));
}
