// emugl-egl/src/tests.rs
//
//! Unit tests.

use crate::egl::{self, EGLint};
use crate::platform::headless::{HeadlessDriver, HeadlessObject};
use crate::table::ObjectTable;
use crate::{ConfigAttributes, ConfigHandle, ConfigTemplate, Connection, Context, ContextHandle};
use crate::{Display, DisplayState, Error, GLESVersion, Image, ImageHandle, InternalDisplay};
use crate::NamedObjectType;
use crate::{NativeDisplay, NativePixmap, NativeWindow, RenderableType, Surface, SurfaceHandle};
use crate::{SurfaceTypeMask, WindowingApiError};

use euclid::default::Size2D;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::thread;

const ALL_GLES: RenderableType = RenderableType::OPENGL_ES
    .union(RenderableType::OPENGL_ES2)
    .union(RenderableType::OPENGL_ES3);

fn create_display(driver: &Arc<HeadlessDriver>) -> Display {
    Display::new(driver.clone(), NativeDisplay(1), InternalDisplay(0x100), true)
}

fn initialized_display() -> (Arc<HeadlessDriver>, Display) {
    let driver = Arc::new(HeadlessDriver::new());
    let display = create_display(&driver);
    display.initialize(ALL_GLES).unwrap();
    (driver, display)
}

fn config_with_id(display: &Display, config_id: EGLint) -> ConfigHandle {
    display.config_by_id(config_id).unwrap().handle()
}

fn pbuffer(display: &Display) -> Arc<Surface> {
    display.create_pbuffer_surface(config_with_id(display, 1), Size2D::new(16, 16)).unwrap()
}

fn choose(display: &Display, attrib_list: &[EGLint]) -> Vec<EGLint> {
    let mut handles = vec![ConfigHandle::NONE; display.config_count()];
    let count = display.choose_configs_from_attribs(attrib_list, Some(&mut handles[..]));
    handles[..count]
        .iter()
        .map(|&handle| display.config_by_handle(handle).unwrap().config_id())
        .collect()
}

#[test]
fn test_config_count_survives_terminate() {
    let driver = Arc::new(HeadlessDriver::new());
    let display = create_display(&driver);
    assert_eq!(display.config_count(), 0);
    assert_eq!(display.state(), DisplayState::Uninitialized);

    display.initialize(RenderableType::OPENGL_ES2).unwrap();
    assert_eq!(display.config_count(), 7);
    assert!(display.is_initialized());

    display.terminate();
    assert_eq!(display.config_count(), 7);
    assert_eq!(display.state(), DisplayState::Terminated);
}

#[test]
fn test_choose_prefers_smallest_buffer_then_config_id() {
    let (_, display) = initialized_display();

    let rgba8888 = [
        egl::RED_SIZE, 8,
        egl::GREEN_SIZE, 8,
        egl::BLUE_SIZE, 8,
        egl::ALPHA_SIZE, 8,
        egl::RENDERABLE_TYPE, egl::OPENGL_ES2_BIT,
        egl::NONE,
    ];
    assert_eq!(display.choose_configs_from_attribs(&rgba8888, None), 3);
    let mut best = [ConfigHandle::NONE; 1];
    assert_eq!(display.choose_configs_from_attribs(&rgba8888, Some(&mut best[..])), 1);
    assert_eq!(display.config_by_handle(best[0]).unwrap().config_id(), 1);

    let rgb565 = [egl::RED_SIZE, 5, egl::GREEN_SIZE, 6, egl::BLUE_SIZE, 5, egl::NONE];
    let chosen = choose(&display, &rgb565);
    assert_eq!(chosen.len(), 7);
    assert_eq!(&chosen[..2], &[5, 6]);
}

#[test]
fn test_config_lookups_agree() {
    let (_, display) = initialized_display();
    let mut handles = vec![ConfigHandle::NONE; display.config_count()];
    assert_eq!(display.list_configs(&mut handles), handles.len());

    for handle in handles {
        let config = display.config_by_handle(handle).unwrap();
        let by_id = display.config_by_id(config.config_id()).unwrap();
        assert_eq!(by_id.handle(), handle);
        assert_eq!(display.config_by_handle(by_id.handle()).unwrap().config_id(),
                   config.config_id());
        assert_eq!(config.get_attrib(egl::CONFIG_ID), Some(config.config_id()));
    }

    assert!(display.config_by_handle(ConfigHandle::NONE).is_none());
    assert!(display.config_by_handle(ConfigHandle::from_raw(1000)).is_none());
    assert!(display.config_by_id(1000).is_none());
}

#[test]
fn test_choose_count_matches_unbounded_output() {
    let (_, display) = initialized_display();
    let templates: [&[EGLint]; 4] = [
        &[egl::NONE],
        &[egl::DEPTH_SIZE, 16, egl::NONE],
        &[egl::SAMPLES, 4, egl::SURFACE_TYPE, egl::PBUFFER_BIT, egl::NONE],
        &[egl::RED_SIZE, 9, egl::NONE],
    ];

    let mut handles = [ConfigHandle::NONE; 64];
    for attrib_list in templates {
        let count = display.choose_configs_from_attribs(attrib_list, None);
        let written = display.choose_configs_from_attribs(attrib_list, Some(&mut handles[..]));
        assert_eq!(written, count);
    }
    assert_eq!(display.choose_configs_from_attribs(&[egl::RED_SIZE, 9, egl::NONE], None), 0);
}

#[test]
fn test_config_id_overrides_other_criteria() {
    let (_, display) = initialized_display();
    assert_eq!(choose(&display, &[egl::CONFIG_ID, 5, egl::RED_SIZE, 8, egl::NONE]), vec![5]);
}

#[test]
fn test_invalid_attrib_lists_match_nothing() {
    let (_, display) = initialized_display();
    assert_eq!(display.choose_configs_from_attribs(&[0x9999, 1, egl::NONE], None), 0);
    assert_eq!(display.choose_configs_from_attribs(&[egl::RED_SIZE], None), 0);

    let luminance_with_red = [
        egl::COLOR_BUFFER_TYPE, egl::LUMINANCE_BUFFER,
        egl::RED_SIZE, 1,
        egl::NONE,
    ];
    assert_eq!(ConfigTemplate::from_attrib_list(&luminance_with_red), Err(Error::BadAttribute));
    assert_eq!(display.choose_configs_from_attribs(&luminance_with_red, None), 0);
}

#[test]
fn test_missing_configs_are_synthesized() {
    let driver = Arc::new(HeadlessDriver::with_configs(vec![]));
    let display = create_display(&driver);
    display.initialize(ALL_GLES).unwrap();
    assert!(display.is_initialized());
    assert_eq!(display.config_count(), 6);

    let mut handles = vec![ConfigHandle::NONE; display.config_count()];
    display.list_configs(&mut handles);
    for handle in handles {
        let config = display.config_by_handle(handle).unwrap();
        assert!(config.is_synthesized());
        assert!(config.renderable_type().is_empty());
        assert_eq!(config.surface_type(), SurfaceTypeMask::PBUFFER);
        assert_eq!(config.get_attrib(egl::CONFIG_CAVEAT), Some(egl::NON_CONFORMANT_CONFIG));
    }

    let gles2 = [egl::RENDERABLE_TYPE, egl::OPENGL_ES2_BIT, egl::NONE];
    assert_eq!(display.choose_configs_from_attribs(&gles2, None), 0);
    let anything = [egl::SURFACE_TYPE, egl::PBUFFER_BIT, egl::RENDERABLE_TYPE, 0, egl::NONE];
    assert_eq!(display.choose_configs_from_attribs(&anything, None), 6);

    match display.create_pbuffer_surface(config_with_id(&display, 1), Size2D::new(4, 4)) {
        Err(Error::SurfaceCreationFailed(WindowingApiError::BadConfig)) => {}
        other => panic!("unexpected result: {:?}", other.map(|surface| surface.id())),
    }
}

#[test]
fn test_synthesized_configs_follow_driver_ids() {
    let exposed = ConfigAttributes::rgba(8, 8, 8, 8).with_depth_stencil(24, 8).with_config_id(10);
    let driver = Arc::new(HeadlessDriver::with_configs(vec![exposed]));
    let display = create_display(&driver);
    display.initialize(ALL_GLES).unwrap();

    assert_eq!(display.config_count(), 6);
    assert!(!display.config_by_id(10).unwrap().is_synthesized());
    for config_id in 11..16 {
        assert!(display.config_by_id(config_id).unwrap().is_synthesized());
    }
}

#[test]
fn test_no_configs_are_synthesized_above_the_largest_id() {
    let exposed =
        ConfigAttributes::rgba(8, 8, 8, 8).with_depth_stencil(24, 8).with_config_id(i32::MAX);
    let driver = Arc::new(HeadlessDriver::with_configs(vec![
        ConfigAttributes::rgba(5, 6, 5, 0).with_config_id(4),
        exposed,
    ]));
    let display = create_display(&driver);
    display.initialize(ALL_GLES).unwrap();

    assert_eq!(display.config_count(), 2);
    assert!(!display.config_by_id(4).unwrap().is_synthesized());
    assert!(!display.config_by_id(i32::MAX).unwrap().is_synthesized());
    assert_eq!(choose(&display, &[egl::CONFIG_ID, i32::MAX, egl::NONE]), vec![i32::MAX]);
}

#[test]
fn test_duplicate_config_ids_are_dropped() {
    let driver = Arc::new(HeadlessDriver::with_configs(vec![
        ConfigAttributes::rgba(8, 8, 8, 8).with_depth_stencil(24, 8).with_config_id(3),
        ConfigAttributes::rgba(5, 6, 5, 0).with_config_id(3),
    ]));
    let display = create_display(&driver);
    display.initialize(ALL_GLES).unwrap();

    assert_eq!(display.config_count(), 6);
    assert_eq!(display.config_by_id(3).unwrap().attributes().red_size, 8);
}

#[test]
fn test_initialize_twice_is_idempotent() {
    let (_, display) = initialized_display();
    let mut before = vec![ConfigHandle::NONE; display.config_count()];
    display.list_configs(&mut before);
    let surface = display.add_surface(pbuffer(&display)).unwrap();

    display.initialize(ALL_GLES).unwrap();
    let mut after = vec![ConfigHandle::NONE; display.config_count()];
    display.list_configs(&mut after);
    assert_eq!(before, after);
    assert!(display.get_surface(surface).is_some());
    assert_eq!(display.state(), DisplayState::Initialized);
}

#[test]
fn test_reinitialize_keeps_the_loaded_configs() {
    let (driver, display) = initialized_display();
    display.terminate();

    driver.fail_config_queries(Some(egl::BAD_ALLOC));
    display.initialize(ALL_GLES).unwrap();
    assert_eq!(display.config_count(), 7);
    assert!(display.add_surface(pbuffer(&display)).is_ok());
}

#[test]
fn test_driver_refusal_leaves_display_uninitialized() {
    let driver = Arc::new(HeadlessDriver::new());
    let display = create_display(&driver);
    driver.fail_config_queries(Some(egl::BAD_ALLOC));

    assert_eq!(display.initialize(ALL_GLES),
               Err(Error::DriverRefused(WindowingApiError::BadAlloc)));
    assert_eq!(display.state(), DisplayState::Uninitialized);
    assert_eq!(display.config_count(), 0);

    driver.fail_config_queries(None);
    display.initialize(ALL_GLES).unwrap();
    assert_eq!(display.config_count(), 7);
}

#[test]
fn test_adding_to_an_uninitialized_display_fails() {
    let (driver, display) = initialized_display();
    let context = display.create_context(config_with_id(&display, 1), GLESVersion::GLES2, None)
                         .unwrap();
    let surface = pbuffer(&display);

    let other = Display::new(driver.clone(), NativeDisplay(2), InternalDisplay(0x200), false);
    assert_eq!(other.add_context(context).err(), Some(Error::NotInitialized));
    assert_eq!(other.add_surface(surface).err(), Some(Error::NotInitialized));
    assert!(other.get_context(ContextHandle::from_raw(1)).is_none());
    assert!(!other.remove_surface(SurfaceHandle::from_raw(1)));
    assert_eq!(other.create_pbuffer_surface(ConfigHandle::from_raw(1), Size2D::new(1, 1))
                    .err(),
               Some(Error::NotInitialized));
}

#[test]
fn test_context_handles() {
    let (_, display) = initialized_display();
    let config = config_with_id(&display, 1);
    let context_a = display.create_context(config, GLESVersion::GLES2, None).unwrap();
    let context_b = display.create_context(config, GLESVersion::GLES2, None).unwrap();

    let handle_a = display.add_context(context_a.clone()).unwrap();
    let handle_b = display.add_context(context_b.clone()).unwrap();
    assert_ne!(handle_a, handle_b);
    assert!(!handle_a.is_none());
    assert!(Arc::ptr_eq(&display.get_context(handle_a).unwrap(), &context_a));
    assert!(Arc::ptr_eq(&display.get_context(handle_b).unwrap(), &context_b));

    assert!(display.remove_context(handle_a));
    assert!(display.get_context(handle_a).is_none());
    assert!(!display.remove_context(handle_a));
    assert_eq!(context_a.version(), GLESVersion::GLES2);
    assert_eq!(context_a.config(), config);
    assert_eq!(display.context_count(), 1);
}

#[test]
fn test_stale_handles_never_resolve() {
    let (_, display) = initialized_display();
    let first = display.add_surface(pbuffer(&display)).unwrap();
    assert!(display.remove_surface(first));

    // The slot is reused with a new generation.
    let second = display.add_surface(pbuffer(&display)).unwrap();
    assert_ne!(first, second);
    assert!(display.get_surface(first).is_none());
    assert!(!display.remove_surface(first));
    assert!(display.get_surface(second).is_some());
    assert!(display.get_surface(SurfaceHandle::NONE).is_none());
}

#[test]
fn test_object_table_reuses_slots_with_new_generations() {
    let mut table = ObjectTable::new();
    let mut raw = table.insert(Arc::new(1)).unwrap();
    let mut issued = vec![raw];
    for _ in 0..3 {
        let stale = raw;
        let object = table.remove(stale).unwrap();
        let fresh = table.insert(object).unwrap();
        assert!(!issued.contains(&fresh));
        assert!(table.get(stale).is_none());
        assert!(table.remove(stale).is_none());
        issued.push(fresh);
        raw = fresh;
    }
    assert_eq!(*table.get(raw).unwrap().as_ref(), 1);
    assert_eq!(table.len(), 1);

    let shares = table.drain();
    assert_eq!(shares.len(), 1);
    assert_eq!(table.len(), 0);
}

#[test]
fn test_image_ids_are_monotonic() {
    let (driver, display) = initialized_display();
    let context = display.create_context(config_with_id(&display, 1), GLESVersion::GLES2, None)
                         .unwrap();
    let texture = context.share_group().gen_name(NamedObjectType::Texture).unwrap();
    let image = || {
        display.create_image(&context, texture, Size2D::new(8, 8), glow::RGBA).unwrap()
    };

    let first = display.add_image(image()).unwrap();
    let second = display.add_image(image()).unwrap();
    assert_eq!(first.to_raw(), 1);
    assert_eq!(second.to_raw(), 2);
    assert!(display.remove_image(first));
    assert!(!display.remove_image(first));
    let third = display.add_image(image()).unwrap();
    assert_eq!(third.to_raw(), 3);
    assert!(display.get_image(first).is_none());
    assert_eq!(display.image_count(), 2);
    assert_eq!(driver.live_count(HeadlessObject::Image), 2);
}

#[test]
fn test_image_id_exhaustion() {
    let (_, display) = initialized_display();
    let context = display.create_context(config_with_id(&display, 1), GLESVersion::GLES2, None)
                         .unwrap();
    let texture = context.share_group().gen_name(NamedObjectType::Texture).unwrap();

    display.skip_image_ids_to(u32::MAX);
    let image = display.create_image(&context, texture, Size2D::new(1, 1), glow::RGBA).unwrap();
    assert_eq!(display.add_image(image.clone()).unwrap(), ImageHandle::from_raw(u32::MAX));
    assert_eq!(display.add_image(image.clone()).err(), Some(Error::ImageIdsExhausted));
    assert_eq!(display.add_image(image).err(), Some(Error::ImageIdsExhausted));
    assert_eq!(display.image_count(), 1);
}

#[test]
fn test_terminate_keeps_external_shares() {
    let (driver, display) = initialized_display();
    let context = display.create_context(config_with_id(&display, 1), GLESVersion::GLES2, None)
                         .unwrap();
    let surface = pbuffer(&display);
    let texture = context.share_group().gen_name(NamedObjectType::Texture).unwrap();
    let image = display.create_image(&context, texture, Size2D::new(8, 8), glow::RGBA).unwrap();

    let context_handle = display.add_context(context.clone()).unwrap();
    let surface_handle = display.add_surface(surface.clone()).unwrap();
    let image_handle = display.add_image(image.clone()).unwrap();

    display.terminate();
    assert!(display.get_context(context_handle).is_none());
    assert!(display.get_surface(surface_handle).is_none());
    assert!(display.get_image(image_handle).is_none());
    assert_eq!(display.context_count(), 0);
    assert_eq!(display.surface_count(), 0);
    assert_eq!(display.image_count(), 0);
    assert_eq!(display.add_surface(surface.clone()).err(), Some(Error::NotInitialized));

    assert!(driver.is_live_surface(surface.native_surface()));
    let global_texture = context.share_group().global_name(NamedObjectType::Texture, texture);
    assert_eq!(image.global_texture(), global_texture);
    assert_eq!(context.version(), GLESVersion::GLES2);

    let native_surface = surface.native_surface();
    drop(surface);
    assert!(!driver.is_live_surface(native_surface));
}

#[test]
fn test_native_objects_are_destroyed_with_the_last_share() {
    let (driver, display) = initialized_display();
    let surface = pbuffer(&display);
    let native_surface = surface.native_surface();
    let handle = display.add_surface(surface).unwrap();
    assert!(driver.is_live_surface(native_surface));

    let held = display.get_surface(handle).unwrap();
    assert!(display.remove_surface(handle));
    assert!(driver.is_live_surface(native_surface));
    drop(held);
    assert!(!driver.is_live_surface(native_surface));
}

#[test]
fn test_remove_by_object() {
    let (_, display) = initialized_display();
    let context = display.create_context(config_with_id(&display, 2), GLESVersion::GLES1, None)
                         .unwrap();
    let stranger = display.create_context(config_with_id(&display, 2), GLESVersion::GLES1, None)
                          .unwrap();
    let handle = display.add_context(context.clone()).unwrap();

    assert!(!display.remove_context_object(&stranger));
    assert!(display.remove_context_object(&context));
    assert!(display.get_context(handle).is_none());
    assert!(!display.remove_context_object(&context));

    let surface = pbuffer(&display);
    display.add_surface(surface.clone()).unwrap();
    assert!(display.remove_surface_object(&surface));
    assert_eq!(display.surface_count(), 0);
}

#[test]
fn test_surfaces_on_two_threads() {
    let (driver, display) = initialized_display();
    let display = Arc::new(display);

    let threads: Vec<_> = (0..2).map(|_| {
        let display = display.clone();
        thread::spawn(move || {
            let mut removed = vec![];
            let mut kept = vec![];
            for iteration in 0..500 {
                let surface = pbuffer(&display);
                let native = surface.native_surface();
                let handle = display.add_surface(surface).unwrap();
                assert_eq!(display.get_surface(handle).unwrap().native_surface(), native);
                if iteration % 3 == 0 {
                    kept.push((handle, native));
                } else {
                    assert!(display.remove_surface(handle));
                    removed.push(native);
                }
            }
            (removed, kept)
        })
    }).collect();

    for thread in threads {
        let (removed, kept) = thread.join().unwrap();
        for native in removed {
            assert!(!driver.is_live_surface(native));
        }
        for (handle, native) in kept {
            assert_eq!(display.get_surface(handle).unwrap().native_surface(), native);
        }
    }
    assert_eq!(display.surface_count(), 2 * 167);
    assert_eq!(driver.live_count(HeadlessObject::Surface), 2 * 167);
}

#[test]
fn test_random_operations_on_many_threads() {
    const THREADS: u64 = 4;
    const OPERATIONS: usize = 10_000;

    #[derive(Default)]
    struct Held {
        surfaces: Vec<(SurfaceHandle, Arc<Surface>)>,
        contexts: Vec<(ContextHandle, Arc<Context>)>,
        images: Vec<(ImageHandle, Arc<Image>)>,
        image_ids: Vec<u32>,
    }

    let (driver, display) = initialized_display();
    let display = Arc::new(display);

    let threads: Vec<_> = (0..THREADS).map(|seed| {
        let display = display.clone();
        thread::spawn(move || {
            let mut rng = StdRng::seed_from_u64(seed);
            let base = display.create_context(config_with_id(&display, 1),
                                              GLESVersion::GLES2,
                                              None).unwrap();
            let texture = base.share_group().gen_name(NamedObjectType::Texture).unwrap();
            let mut held = Held::default();
            for _ in 0..OPERATIONS {
                match rng.gen_range(0..9) {
                    0 => {
                        let surface = pbuffer(&display);
                        held.surfaces.push((display.add_surface(surface.clone()).unwrap(),
                                            surface));
                    }
                    1 if !held.surfaces.is_empty() => {
                        let (handle, surface) =
                            &held.surfaces[rng.gen_range(0..held.surfaces.len())];
                        assert!(Arc::ptr_eq(&display.get_surface(*handle).unwrap(), surface));
                    }
                    2 if !held.surfaces.is_empty() => {
                        let index = rng.gen_range(0..held.surfaces.len());
                        let (handle, _) = held.surfaces.swap_remove(index);
                        assert!(display.remove_surface(handle));
                        assert!(display.get_surface(handle).is_none());
                    }
                    3 => {
                        let context = display.create_context(config_with_id(&display, 1),
                                                             GLESVersion::GLES2,
                                                             Some(&base)).unwrap();
                        held.contexts.push((display.add_context(context.clone()).unwrap(),
                                            context));
                    }
                    4 if !held.contexts.is_empty() => {
                        let (handle, context) =
                            &held.contexts[rng.gen_range(0..held.contexts.len())];
                        assert!(Arc::ptr_eq(&display.get_context(*handle).unwrap(), context));
                    }
                    5 if !held.contexts.is_empty() => {
                        let index = rng.gen_range(0..held.contexts.len());
                        let (handle, _) = held.contexts.swap_remove(index);
                        assert!(display.remove_context(handle));
                        assert!(display.get_context(handle).is_none());
                    }
                    6 => {
                        let image = display.create_image(&base,
                                                         texture,
                                                         Size2D::new(2, 2),
                                                         glow::RGBA).unwrap();
                        let handle = display.add_image(image.clone()).unwrap();
                        if let Some(&last) = held.image_ids.last() {
                            assert!(handle.to_raw() > last);
                        }
                        held.image_ids.push(handle.to_raw());
                        held.images.push((handle, image));
                    }
                    7 if !held.images.is_empty() => {
                        let (handle, image) = &held.images[rng.gen_range(0..held.images.len())];
                        assert!(Arc::ptr_eq(&display.get_image(*handle).unwrap(), image));
                    }
                    8 if !held.images.is_empty() => {
                        let index = rng.gen_range(0..held.images.len());
                        let (handle, _) = held.images.swap_remove(index);
                        assert!(display.remove_image(handle));
                        assert!(display.get_image(handle).is_none());
                    }
                    _ => {}
                }
            }
            held
        })
    }).collect();

    let (mut surfaces, mut contexts, mut images) = (0, 0, 0);
    let mut image_ids = vec![];
    for thread in threads {
        let held = thread.join().unwrap();
        for (handle, _) in &held.surfaces {
            assert!(display.get_surface(*handle).is_some());
        }
        for (handle, _) in &held.contexts {
            assert!(display.get_context(*handle).is_some());
        }
        for (handle, _) in &held.images {
            assert!(display.get_image(*handle).is_some());
        }
        surfaces += held.surfaces.len();
        contexts += held.contexts.len();
        images += held.images.len();
        image_ids.extend(held.image_ids);
    }

    let issued = image_ids.len();
    image_ids.sort_unstable();
    image_ids.dedup();
    assert_eq!(image_ids.len(), issued);

    assert_eq!(display.surface_count(), surfaces);
    assert_eq!(display.context_count(), contexts);
    assert_eq!(display.image_count(), images);
    assert_eq!(driver.live_count(HeadlessObject::Surface), surfaces);
    assert_eq!(driver.live_count(HeadlessObject::Image), images);
    // The global shared context outlives the per-thread base contexts.
    assert_eq!(driver.live_count(HeadlessObject::Context), contexts + 1);
}

#[test]
fn test_global_shared_context_is_created_once() {
    let (driver, display) = initialized_display();
    let shared = display.global_shared_context().unwrap();
    assert_eq!(display.global_shared_context().unwrap(), shared);
    assert_eq!(driver.created_context_count(), 1);

    let config = config_with_id(&display, 1);
    let _a = display.create_context(config, GLESVersion::GLES2, None).unwrap();
    let _b = display.create_context(config, GLESVersion::GLES1, None).unwrap();
    assert_eq!(driver.created_context_count(), 3);
}

#[test]
fn test_global_shared_context_failure() {
    let (driver, display) = initialized_display();
    driver.fail_context_creation(Some(egl::BAD_ALLOC));
    assert_eq!(display.global_shared_context(),
               Err(Error::ContextCreationFailed(WindowingApiError::BadAlloc)));
    assert_eq!(display.create_context(config_with_id(&display, 1), GLESVersion::GLES2, None)
                      .err(),
               Some(Error::ContextCreationFailed(WindowingApiError::BadAlloc)));

    driver.fail_context_creation(None);
    assert!(display.global_shared_context().is_ok());
}

#[test]
fn test_global_shared_context_is_destroyed_with_the_display() {
    let (driver, display) = initialized_display();
    let context = display.create_context(config_with_id(&display, 1), GLESVersion::GLES2, None)
                         .unwrap();
    display.add_context(context.clone()).unwrap();
    assert_eq!(driver.live_count(HeadlessObject::Context), 2);

    drop(display);
    assert_eq!(driver.live_count(HeadlessObject::Context), 1);
    drop(context);
    assert_eq!(driver.live_count(HeadlessObject::Context), 0);
}

#[test]
fn test_share_groups() {
    let (_, display) = initialized_display();
    let config = config_with_id(&display, 1);
    let first = display.create_context(config, GLESVersion::GLES2, None).unwrap();
    let second = display.create_context(config, GLESVersion::GLES2, Some(&first)).unwrap();
    let loner = display.create_context(config, GLESVersion::GLES2, None).unwrap();
    assert_eq!(first.share_group().id(), second.share_group().id());
    assert_ne!(first.share_group().id(), loner.share_group().id());

    let buffer = first.share_group().gen_name(NamedObjectType::Buffer).unwrap();
    let global = second.share_group().global_name(NamedObjectType::Buffer, buffer).unwrap();
    assert!(!loner.share_group().is_object(NamedObjectType::Buffer, buffer));
    assert_eq!(second.share_group().local_name(NamedObjectType::Buffer, global), Some(buffer));

    let manager = display.manager(GLESVersion::GLES2);
    assert_eq!(manager.share_group_count(), 2);
    assert!(manager.share_group(first.share_group().id()).is_some());

    let names = display.global_name_space().clone();
    assert!(names.is_live(NamedObjectType::Buffer, global));
    drop(first);
    assert!(names.is_live(NamedObjectType::Buffer, global));
    drop(second);
    assert!(!names.is_live(NamedObjectType::Buffer, global));
    assert_eq!(manager.share_group_count(), 1);
}

#[test]
fn test_sharing_across_versions_fails() {
    let (_, display) = initialized_display();
    let config = config_with_id(&display, 1);
    let gles2 = display.create_context(config, GLESVersion::GLES2, None).unwrap();
    assert_eq!(display.create_context(config, GLESVersion::GLES1, Some(&gles2)).err(),
               Some(Error::IncompatibleSharedContext));
}

#[test]
fn test_context_needs_a_renderable_config() {
    let driver = Arc::new(HeadlessDriver::new());
    let display = create_display(&driver);
    display.initialize(RenderableType::OPENGL_ES2).unwrap();
    let config = config_with_id(&display, 1);

    assert_eq!(display.create_context(config, GLESVersion::GLES1, None).err(),
               Some(Error::ContextCreationFailed(WindowingApiError::BadConfig)));
    assert!(display.create_context(config, GLESVersion::GLES2, None).is_ok());
    assert_eq!(display.create_context(ConfigHandle::from_raw(99), GLESVersion::GLES2, None)
                      .err(),
               Some(Error::NoSuchConfig));
}

#[test]
fn test_name_managers() {
    let (_, display) = initialized_display();
    assert_eq!(display.manager_at(0).unwrap().version(), GLESVersion::GLES1);
    assert_eq!(display.manager_at(1).unwrap().version(), GLESVersion::GLES2);
    assert_eq!(display.manager_at(2).err(), Some(Error::UnsupportedGLESVersion));
    assert!(Arc::ptr_eq(display.manager(GLESVersion::GLES1).global_name_space(),
                        display.manager(GLESVersion::GLES2).global_name_space()));

    assert_eq!(GLESVersion::from_client_version(3), Ok(GLESVersion::GLES2));
    assert_eq!(GLESVersion::try_from(1), Ok(GLESVersion::GLES1));
    assert_eq!(GLESVersion::try_from(4), Err(Error::UnsupportedGLESVersion));
}

#[test]
fn test_client_chosen_names() {
    let (_, display) = initialized_display();
    let group = display.manager(GLESVersion::GLES1).create_share_group();

    let global = group.gen_name_with(NamedObjectType::Texture, 7).unwrap();
    assert_eq!(group.gen_name_with(NamedObjectType::Texture, 7), Ok(global));
    assert_eq!(group.gen_name_with(NamedObjectType::Texture, 0), Err(Error::NoSuchName));
    assert_eq!(group.gen_name(NamedObjectType::Texture), Ok(1));
    assert!(group.is_object(NamedObjectType::Texture, 7));
    assert!(!group.is_object(NamedObjectType::Renderbuffer, 7));

    assert!(group.delete_name(NamedObjectType::Texture, 7));
    assert!(!group.delete_name(NamedObjectType::Texture, 7));
    assert!(!display.global_name_space().is_live(NamedObjectType::Texture, global));
    assert_eq!(NamedObjectType::Texture.gl_identifier(), glow::TEXTURE);
}

#[test]
fn test_image_texture_bindings() {
    let (driver, display) = initialized_display();
    let context = display.create_context(config_with_id(&display, 1), GLESVersion::GLES2, None)
                         .unwrap();
    let group = context.share_group();
    let texture = group.gen_name(NamedObjectType::Texture).unwrap();
    let global = group.global_name(NamedObjectType::Texture, texture).unwrap();

    assert_eq!(display.create_image(&context, texture + 1, Size2D::new(4, 4), glow::RGBA).err(),
               Some(Error::NoSuchName));
    driver.fail_image_creation(Some(egl::BAD_MATCH));
    assert_eq!(display.create_image(&context, texture, Size2D::new(4, 4), glow::RGBA).err(),
               Some(Error::ImageCreationFailed(WindowingApiError::BadMatch)));
    driver.fail_image_creation(None);

    let image = display.create_image(&context, texture, Size2D::new(4, 4), glow::RGBA).unwrap();
    assert_eq!(image.global_texture(), Some(global));
    assert_eq!(image.size(), Size2D::new(4, 4));
    let handle = display.add_image(image).unwrap();

    let target = group.gen_name(NamedObjectType::Texture).unwrap();
    let target = group.global_name(NamedObjectType::Texture, target).unwrap();
    display.bind_image_texture(target, handle).unwrap();
    assert_eq!(display.image_for_texture(target), Some(handle));
    assert_eq!(display.bind_image_texture(0xffff, handle), Err(Error::NoSuchName));

    assert!(display.remove_image(handle));
    assert_eq!(display.image_for_texture(target), None);
    assert_eq!(display.bind_image_texture(target, handle), Err(Error::NoSuchImage));
    assert_eq!(display.image_for_texture(target), None);
    assert_eq!(driver.live_count(HeadlessObject::Image), 0);
}

#[test]
fn test_image_bindings_cleared_on_terminate() {
    let (_, display) = initialized_display();
    let context = display.create_context(config_with_id(&display, 1), GLESVersion::GLES2, None)
                         .unwrap();
    let group = context.share_group();
    let texture = group.gen_name(NamedObjectType::Texture).unwrap();
    let global = group.global_name(NamedObjectType::Texture, texture).unwrap();
    let image = display.create_image(&context, texture, Size2D::new(2, 2), glow::RGBA).unwrap();
    let handle = display.add_image(image).unwrap();
    display.bind_image_texture(global, handle).unwrap();

    display.terminate();
    assert_eq!(display.image_for_texture(global), None);
}

#[test]
fn test_binding_races_with_image_removal() {
    let (_, display) = initialized_display();
    let context = display.create_context(config_with_id(&display, 1), GLESVersion::GLES2, None)
                         .unwrap();
    let group = context.share_group();
    let texture = group.gen_name(NamedObjectType::Texture).unwrap();
    let global = group.global_name(NamedObjectType::Texture, texture).unwrap();

    for _ in 0..50 {
        let image = display.create_image(&context, texture, Size2D::new(2, 2), glow::RGBA)
                           .unwrap();
        let handle = display.add_image(image).unwrap();
        thread::scope(|scope| {
            scope.spawn(|| {
                let _ = display.bind_image_texture(global, handle);
            });
            scope.spawn(|| assert!(display.remove_image(handle)));
        });
        assert_eq!(display.image_for_texture(global), None);
    }
}

#[test]
fn test_global_names_run_out_without_wrapping() {
    let (_, display) = initialized_display();
    let context = display.create_context(config_with_id(&display, 1), GLESVersion::GLES2, None)
                         .unwrap();
    let group = context.share_group();
    display.global_name_space().skip_names_to(NamedObjectType::Buffer, u32::MAX);

    assert_eq!(group.gen_name(NamedObjectType::Buffer), Err(Error::NamesExhausted));
    assert_eq!(group.gen_name_with(NamedObjectType::Buffer, 5), Err(Error::NamesExhausted));
    assert_eq!(group.global_name(NamedObjectType::Buffer, 5), None);
    assert!(group.gen_name(NamedObjectType::Texture).is_ok());
}

#[test]
fn test_local_names_run_out_without_wrapping() {
    let (_, display) = initialized_display();
    let context = display.create_context(config_with_id(&display, 1), GLESVersion::GLES2, None)
                         .unwrap();
    let group = context.share_group();
    group.skip_local_names_to(NamedObjectType::Texture, u32::MAX - 1);

    assert_eq!(group.gen_name(NamedObjectType::Texture), Ok(u32::MAX));
    assert_eq!(group.gen_name(NamedObjectType::Texture), Err(Error::NamesExhausted));
    assert!(group.global_name(NamedObjectType::Texture, u32::MAX).is_some());
}

#[test]
fn test_surface_kinds_need_matching_configs() {
    let mut pbuffer_only = ConfigAttributes::rgba(8, 8, 8, 8).with_config_id(1);
    pbuffer_only.surface_type = SurfaceTypeMask::PBUFFER;
    let driver = Arc::new(HeadlessDriver::with_configs(vec![
        pbuffer_only,
        ConfigAttributes::rgba(8, 8, 8, 0).with_config_id(2),
    ]));
    let display = create_display(&driver);
    display.initialize(ALL_GLES).unwrap();

    let pbuffer_config = config_with_id(&display, 1);
    let any_config = config_with_id(&display, 2);
    assert_eq!(display.create_window_surface(pbuffer_config, NativeWindow(5)).err(),
               Some(Error::IncompatibleConfig));
    assert_eq!(display.create_window_surface(any_config, NativeWindow(0)).err(),
               Some(Error::SurfaceCreationFailed(WindowingApiError::BadNativeWindow)));
    assert_eq!(display.create_pbuffer_surface(any_config, Size2D::new(-1, 4)).err(),
               Some(Error::BadAttribute));

    let window = display.create_window_surface(any_config, NativeWindow(5)).unwrap();
    let pixmap = display.create_pixmap_surface(any_config, NativePixmap(6)).unwrap();
    assert_ne!(window.id(), pixmap.id());
    assert_eq!(window.config(), any_config);
    assert_eq!(driver.live_count(HeadlessObject::Surface), 2);
}

#[test]
fn test_connection_reuses_displays() {
    let connection = Connection::new(Arc::new(HeadlessDriver::new()));
    assert!(connection.default_display().is_none());

    let first = connection.add_display(NativeDisplay(1), InternalDisplay(0x10));
    let again = connection.add_display(NativeDisplay(1), InternalDisplay(0x10));
    let second = connection.add_display(NativeDisplay(2), InternalDisplay(0x20));
    assert!(Arc::ptr_eq(&first, &again));
    assert!(first.is_default());
    assert!(!second.is_default());
    assert_eq!(connection.display_count(), 2);
    assert!(Arc::ptr_eq(&connection.default_display().unwrap(), &first));
    assert!(Arc::ptr_eq(&connection.display(NativeDisplay(2)).unwrap(), &second));
    assert_eq!(second.internal_display(), InternalDisplay(0x20));

    assert!(connection.remove_display(NativeDisplay(1)));
    assert!(!connection.remove_display(NativeDisplay(1)));
    assert!(connection.default_display().is_none());
    assert_eq!(connection.display_count(), 1);
}
