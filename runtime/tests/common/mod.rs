//! Shared fakes for runtime integration tests.

#![allow(dead_code)]

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use slice_scanner::{SideListing, Variant, VendorRegistration};
use slice_scanner_runtime::surface::{Driver, Element, Surface};
use slice_scanner_runtime::vendors::enumerate::{SizeOption, VariantBinding};
use slice_scanner_runtime::vendors::{Emitter, Vendor};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ── Surfaces and drivers ──

/// A surface with nothing on it. Counts closes.
pub struct NullSurface {
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl Surface for NullSurface {
    async fn navigate(&mut self, _url: &str, _timeout: Duration) -> Result<()> {
        Ok(())
    }
    async fn run_script(&self, _script: &str) -> Result<Value> {
        Ok(Value::Null)
    }
    async fn enumerate(&self, _selector: &str) -> Result<Vec<Box<dyn Element>>> {
        Ok(Vec::new())
    }
    async fn close(self: Box<Self>) -> Result<()> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Driver handing out [`NullSurface`]s and counting session lifecycle.
#[derive(Default)]
pub struct CountingDriver {
    pub opened: Arc<AtomicUsize>,
    pub closed: Arc<AtomicUsize>,
}

impl CountingDriver {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Driver for CountingDriver {
    async fn new_session(&self) -> Result<Box<dyn Surface>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(NullSurface {
            closed: Arc::clone(&self.closed),
        }))
    }
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

pub fn null_surface() -> Box<dyn Surface> {
    Box::new(NullSurface {
        closed: Arc::new(AtomicUsize::new(0)),
    })
}

// ── Vendors ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Login,
    Pizzas,
    Sides,
}

/// Scripted vendor: emits fixed records and fails or panics on request.
pub struct FakeVendor {
    registration: VendorRegistration,
    pub pizzas: Vec<Variant>,
    pub sides: Vec<SideListing>,
    pub fail_at: Option<Step>,
    pub panic_at: Option<Step>,
    pub calls: Arc<Mutex<Vec<(String, Step)>>>,
}

impl FakeVendor {
    pub fn new(id: &str) -> Self {
        Self {
            registration: VendorRegistration::new(id, format!("https://{id}.test"))
                .with_size("small", 9.5, 6)
                .with_size("large", 13.5, 10),
            pizzas: Vec::new(),
            sides: Vec::new(),
            fail_at: None,
            panic_at: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_pizza(mut self, title: &str, size: &str, crust: &str, price: i64) -> Self {
        self.pizzas.push(variant(title, size, crust, price));
        self
    }

    pub fn with_side(mut self, name: &str, price: i64) -> Self {
        self.sides.push(SideListing {
            name: Some(name.into()),
            price: Some(Decimal::new(price, 2)),
            ..Default::default()
        });
        self
    }

    pub fn failing_at(mut self, step: Step) -> Self {
        self.fail_at = Some(step);
        self
    }

    pub fn panicking_at(mut self, step: Step) -> Self {
        self.panic_at = Some(step);
        self
    }

    pub fn sharing_calls(mut self, calls: &Arc<Mutex<Vec<(String, Step)>>>) -> Self {
        self.calls = Arc::clone(calls);
        self
    }

    fn enter(&self, step: Step) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((self.registration.id.clone(), step));
        if self.panic_at == Some(step) {
            panic!("{} blew up during {step:?}", self.registration.id);
        }
        if self.fail_at == Some(step) {
            bail!("{} refused {step:?}", self.registration.id);
        }
        Ok(())
    }
}

#[async_trait]
impl Vendor for FakeVendor {
    fn registration(&self) -> &VendorRegistration {
        &self.registration
    }

    async fn login(&self, _surface: &mut dyn Surface) -> Result<()> {
        self.enter(Step::Login)
    }

    async fn get_pizzas(&self, _surface: &mut dyn Surface, emitter: &mut Emitter<'_>) -> Result<()> {
        self.enter(Step::Pizzas)?;
        for pizza in &self.pizzas {
            emitter.pizza(pizza.clone());
        }
        Ok(())
    }

    async fn get_sides(&self, _surface: &mut dyn Surface, emitter: &mut Emitter<'_>) -> Result<()> {
        self.enter(Step::Sides)?;
        for side in &self.sides {
            emitter.side(side.clone());
        }
        Ok(())
    }
}

pub fn variant(title: &str, size: &str, crust: &str, price: i64) -> Variant {
    Variant {
        title: Some(title.into()),
        toppings: vec!["Pepperoni".into(), "Mushrooms".into()],
        size: size.into(),
        price: Some(Decimal::new(price, 2)),
        crust: crust.into(),
        image: None,
    }
}

// ── Variant bindings ──

#[derive(Default)]
struct BindingState {
    committed: Option<String>,
    remaining: VecDeque<String>,
    visits: Vec<(String, String)>,
    dismissals: usize,
}

/// Configurator whose crust list depends on the committed size. Remaining
/// options rotate after every pick, so positions never stay put.
pub struct FakeBinding {
    menu: Vec<(String, Vec<String>)>,
    state: Mutex<BindingState>,
    pub fail_capture: Option<(String, String)>,
    pub fail_commit: Option<String>,
    /// Consuming never removes the option.
    pub stall: bool,
}

impl FakeBinding {
    pub fn new(menu: &[(&str, &[&str])]) -> Self {
        Self {
            menu: menu
                .iter()
                .map(|(size, crusts)| {
                    (
                        size.to_string(),
                        crusts.iter().map(|c| c.to_string()).collect(),
                    )
                })
                .collect(),
            state: Mutex::new(BindingState::default()),
            fail_capture: None,
            fail_commit: None,
            stall: false,
        }
    }

    pub fn visits(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().visits.clone()
    }

    pub fn dismissals(&self) -> usize {
        self.state.lock().unwrap().dismissals
    }
}

#[async_trait]
impl VariantBinding for FakeBinding {
    async fn sizes(&self, _surface: &mut dyn Surface) -> Result<Vec<SizeOption>> {
        Ok(self
            .menu
            .iter()
            .enumerate()
            .map(|(index, (label, _))| SizeOption {
                index,
                label: label.clone(),
            })
            .collect())
    }

    async fn commit_size(&self, _surface: &mut dyn Surface, size: &SizeOption) -> Result<()> {
        if self.fail_commit.as_deref() == Some(size.label.as_str()) {
            bail!("size button {} is disabled", size.label);
        }
        self.state.lock().unwrap().committed = Some(size.label.clone());
        Ok(())
    }

    async fn dismiss_conflict(&self, _surface: &mut dyn Surface) -> Result<()> {
        self.state.lock().unwrap().dismissals += 1;
        Ok(())
    }

    async fn open_crusts(&self, _surface: &mut dyn Surface) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let committed = state.committed.clone().ok_or_else(|| anyhow!("no size"))?;
        let crusts = self
            .menu
            .iter()
            .find(|(label, _)| *label == committed)
            .map(|(_, crusts)| crusts.clone())
            .unwrap_or_default();
        state.remaining = crusts.into();
        Ok(())
    }

    async fn crusts_remaining(&self, _surface: &mut dyn Surface) -> Result<bool> {
        Ok(!self.state.lock().unwrap().remaining.is_empty())
    }

    async fn consume_crust(&self, _surface: &mut dyn Surface) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        if self.stall {
            return state
                .remaining
                .front()
                .cloned()
                .ok_or_else(|| anyhow!("empty"));
        }
        let crust = state.remaining.pop_front().ok_or_else(|| anyhow!("empty"))?;
        if !state.remaining.is_empty() {
            state.remaining.rotate_left(1);
        }
        let size = state.committed.clone().unwrap_or_default();
        state.visits.push((size, crust.clone()));
        Ok(crust)
    }

    async fn settle(&self, _surface: &mut dyn Surface) -> Result<()> {
        Ok(())
    }

    async fn capture(
        &self,
        _surface: &mut dyn Surface,
        size: &SizeOption,
        crust: &str,
    ) -> Result<Variant> {
        if let Some((s, c)) = &self.fail_capture {
            if *s == size.label && c == crust {
                bail!("price element missing");
            }
        }
        Ok(variant("Test Pizza", &size.label, crust, 1299))
    }
}
