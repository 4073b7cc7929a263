//! Background airplanes drifting across the page.

use rand::Rng;

use crate::view::{ElementId, NewElement, View};

pub const AIRPLANE_CLASS: &str = "airplane";
const AIRPLANES: usize = 3;

pub fn add_airplanes(view: &dyn View) -> Vec<ElementId> {
    let mut rng = rand::thread_rng();
    let body = view.body();
    (0..AIRPLANES)
        .map(|_| {
            let top: f64 = rng.gen_range(10.0..90.0);
            let left: f64 = rng.gen_range(-20.0..0.0);
            let delay: f64 = rng.gen_range(0.0..20.0);
            view.append(
                body,
                NewElement {
                    tag: "div".into(),
                    classes: vec![AIRPLANE_CLASS.into()],
                    content: "✈".into(),
                    styles: vec![
                        ("top".into(), format!("{:.2}%", top)),
                        ("left".into(), format!("{:.2}%", left)),
                        ("animation-delay".into(), format!("{:.2}s", delay)),
                    ],
                },
            )
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/page/decor.rs"]
mod tests;
