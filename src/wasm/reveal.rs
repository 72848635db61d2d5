use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};

use super::dom;
use crate::error::SiteResult;
use crate::reveal::{
    skill_bar_width, MotionMap, Retract, RevealConfig, RevealCoordinator, ALL_CLASSES,
};
use crate::scroll::{ScrollHub, Subscription};

pub const REGION_SELECTOR: &str = "[data-reveal-region]";

/// Elements inside a region whose look follows the region's phase.
struct Targets {
    animated: Vec<(Element, MotionMap)>,
    skill_bars: Vec<(HtmlElement, u8)>,
}

impl Targets {
    fn collect(region: &Element) -> SiteResult<Self> {
        let animated = dom::select_all(region, "[data-reveal]")?
            .into_iter()
            .map(|el| {
                let motion = el
                    .get_attribute("data-reveal")
                    .map(|v| MotionMap::parse(&v))
                    .unwrap_or_default();
                (el, motion)
            })
            .collect();
        let skill_bars = dom::select_all(region, "[data-level]")?
            .into_iter()
            .filter_map(|el| {
                let level = el.get_attribute("data-level")?.parse().ok()?;
                Some((el.dyn_into::<HtmlElement>().ok()?, level))
            })
            .collect();
        Ok(Self {
            animated,
            skill_bars,
        })
    }

    fn apply(&self, coordinator: &RevealCoordinator) {
        let phase = coordinator.phase();
        for (el, motion) in &self.animated {
            dom::swap_class(el, &ALL_CLASSES, motion.class_for(phase));
        }
        let revealed = coordinator.is_revealed();
        for (bar, level) in &self.skill_bars {
            let _ = bar
                .style()
                .set_property("width", &skill_bar_width(revealed, *level));
        }
    }
}

/// Binds one region to the browser's intersection observer and the shared
/// scroll hub. Dropping it stops observation.
pub struct RevealBinding {
    region: Element,
    observer: IntersectionObserver,
    coordinator: Rc<RefCell<RevealCoordinator>>,
    _on_intersect: Closure<dyn FnMut(Array, IntersectionObserver)>,
    _scroll: Subscription,
}

impl RevealBinding {
    /// Bind every region currently in the document.
    pub fn attach_all(document: &Document, hub: &ScrollHub, threshold: f64) -> Vec<Self> {
        let Some(root) = document.document_element() else {
            return Vec::new();
        };
        let regions = match dom::select_all(&root, REGION_SELECTOR) {
            Ok(regions) => regions,
            Err(err) => {
                log::warn!("reveal regions unavailable: {err}");
                return Vec::new();
            }
        };
        regions
            .into_iter()
            .filter_map(|region| {
                let retract = match region.get_attribute("data-reveal-region").as_deref() {
                    Some("exit") => Retract::OnExit,
                    _ => Retract::OnScrollUp,
                };
                let config = RevealConfig { threshold, retract };
                match Self::attach(region, config, hub) {
                    Ok(binding) => Some(binding),
                    Err(err) => {
                        log::warn!("skipping reveal region: {err}");
                        None
                    }
                }
            })
            .collect()
    }

    /// Bind a single region by id. A missing element is skipped, not an error.
    pub fn attach_by_id(
        document: &Document,
        id: &str,
        config: RevealConfig,
        hub: &ScrollHub,
    ) -> SiteResult<Option<Self>> {
        match document.get_element_by_id(id) {
            Some(region) => Self::attach(region, config, hub).map(Some),
            None => {
                log::debug!("reveal region #{id} not in document yet");
                Ok(None)
            }
        }
    }

    pub fn attach(region: Element, config: RevealConfig, hub: &ScrollHub) -> SiteResult<Self> {
        let coordinator = Rc::new(RefCell::new(RevealCoordinator::new(config)));
        coordinator.borrow_mut().mount(hub.latest().offset);

        let targets = Rc::new(Targets::collect(&region)?);
        targets.apply(&coordinator.borrow());

        let on_intersect = {
            let coordinator = Rc::clone(&coordinator);
            let targets = Rc::clone(&targets);
            Closure::wrap(Box::new(move |entries: Array, _: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    let changed = coordinator
                        .borrow_mut()
                        .on_intersection(entry.is_intersecting());
                    if changed.is_some() {
                        targets.apply(&coordinator.borrow());
                    }
                }
            }) as Box<dyn FnMut(Array, IntersectionObserver)>)
        };

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(config.threshold));
        let observer =
            IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &init)?;
        observer.observe(&region);

        let scroll = {
            let coordinator = Rc::clone(&coordinator);
            hub.subscribe(move |sample| {
                let mut coordinator = coordinator.borrow_mut();
                let before = coordinator.phase();
                coordinator.on_scroll(sample);
                if coordinator.phase() != before {
                    targets.apply(&coordinator);
                }
            })
        };

        Ok(Self {
            region,
            observer,
            coordinator,
            _on_intersect: on_intersect,
            _scroll: scroll,
        })
    }

    pub fn is_revealed(&self) -> bool {
        self.coordinator.borrow().is_revealed()
    }
}

impl Drop for RevealBinding {
    fn drop(&mut self) {
        self.coordinator.borrow_mut().unmount();
        self.observer.unobserve(&self.region);
        self.observer.disconnect();
    }
}
