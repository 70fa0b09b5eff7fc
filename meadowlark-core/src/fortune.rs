use rand::seq::SliceRandom;

pub const FORTUNES: &[&str] = &[
    "Conquer your fears or they will conquer you.",
    "Rivers need springs.",
    "Do not fear what you don't know.",
    "You will have a pleasant surprise.",
    "Whenever possible, keep it simple.",
];

/// A fortune cookie for the about page.
pub fn get_fortune() -> &'static str {
    FORTUNES.choose(&mut rand::thread_rng()).copied().unwrap_or(FORTUNES[0])
}
