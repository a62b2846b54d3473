use std::cell::RefCell;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use futures::task::{LocalSpawn, LocalSpawnExt};

use crate::assets::resolver::ImageSizeResolver;
use crate::compose::color::render_color;
use crate::foundation::core::PageSize;
use crate::foundation::error::BackgroundResult;
use crate::layout::geometry::{MediaGeometry, resolve_geometry};
use crate::schema::model::{MediaLayer, SlideBackground};
use crate::sync::config::SyncOpts;
use crate::sync::host::{ElementId, ElementInit, ElementPatch, HostPage, Interaction};

type GeometryTask = LocalBoxFuture<'static, BackgroundResult<()>>;

/// Writes a [`SlideBackground`] onto a host page.
///
/// The color layer, the metadata record and the presence of the background-media element are
/// settled before [`apply`](Self::apply) returns. Element geometry depends on the media's natural
/// size and is written by a task spawned on `S`.
pub struct BackgroundSynchronizer<S> {
    resolver: ImageSizeResolver,
    spawner: S,
    opts: SyncOpts,
}

impl<S: LocalSpawn> BackgroundSynchronizer<S> {
    pub fn new(resolver: ImageSizeResolver, spawner: S) -> Self {
        Self {
            resolver,
            spawner,
            opts: SyncOpts::default(),
        }
    }

    pub fn with_opts(mut self, opts: SyncOpts) -> BackgroundResult<Self> {
        opts.validate()?;
        self.opts = opts;
        Ok(self)
    }

    pub fn opts(&self) -> &SyncOpts {
        &self.opts
    }

    pub fn resolver(&self) -> &ImageSizeResolver {
        &self.resolver
    }

    /// Fire-and-forget sync. Geometry lands once the spawned task runs; its failures are logged.
    #[tracing::instrument(skip_all, fields(media = background.media.is_some()))]
    pub fn apply<P>(&self, page: &Rc<RefCell<P>>, background: &SlideBackground) -> BackgroundResult<()>
    where
        P: HostPage + 'static,
    {
        let Some(task) = self.prepare(page, background)? else {
            return Ok(());
        };
        self.spawner
            .spawn_local(task.map(|res| {
                if let Err(err) = res {
                    tracing::warn!(error = %err, "background geometry update failed");
                }
            }))
            .map_err(|e| anyhow::Error::new(e).context("spawn background geometry task"))?;
        Ok(())
    }

    /// Same as [`apply`](Self::apply) but resolves only after the geometry has been written.
    #[tracing::instrument(skip_all, fields(media = background.media.is_some()))]
    pub async fn apply_settled<P>(
        &self,
        page: &Rc<RefCell<P>>,
        background: &SlideBackground,
    ) -> BackgroundResult<()>
    where
        P: HostPage + 'static,
    {
        match self.prepare(page, background)? {
            Some(task) => task.await,
            None => Ok(()),
        }
    }

    fn prepare<P>(
        &self,
        page: &Rc<RefCell<P>>,
        background: &SlideBackground,
    ) -> BackgroundResult<Option<GeometryTask>>
    where
        P: HostPage + 'static,
    {
        let (id, media) = {
            let mut host = page.borrow_mut();
            let size = PageSize::or_fallback(host.size(), self.opts.fallback_size);

            let native = render_color(&background.color, Some(size)).to_native_background();
            if host.native_background() != native {
                host.set_native_background(&native);
            }

            let record = background.to_json();
            if host.metadata(&self.opts.metadata_key).as_ref() != Some(&record) {
                host.set_metadata(&self.opts.metadata_key, record);
            }

            let Some(media) = &background.media else {
                self.remove_media_elements(&mut *host)?;
                return Ok(None);
            };
            (
                self.ensure_media_element(&mut *host, media, size)?,
                media.clone(),
            )
        };

        Ok(Some(
            place_media(
                page.clone(),
                self.resolver.clone(),
                id,
                media,
                self.opts.fallback_size,
            )
            .boxed_local(),
        ))
    }

    fn remove_media_elements<P: HostPage>(&self, host: &mut P) -> BackgroundResult<()> {
        for id in host.element_ids_with_flag(&self.opts.role_flag) {
            host.remove_element(id)?;
            tracing::debug!(%id, "removed background media element");
        }
        Ok(())
    }

    fn ensure_media_element<P: HostPage>(
        &self,
        host: &mut P,
        media: &MediaLayer,
        size: PageSize,
    ) -> BackgroundResult<ElementId> {
        let mut ids = host.element_ids_with_flag(&self.opts.role_flag).into_iter();
        let id = match ids.next() {
            Some(id) => {
                for extra in ids {
                    host.remove_element(extra)?;
                    tracing::debug!(id = %extra, "collapsed duplicate background media element");
                }
                let current = host.element(id);
                let mut patch = ElementPatch::default();
                if current.as_ref().map(|el| el.src.as_str()) != Some(media.media_url()) {
                    patch.src = Some(media.media_url().to_string());
                    patch.geometry = Some(MediaGeometry::full_page(size));
                }
                if current.as_ref().map(|el| el.interaction) != Some(Interaction::LOCKED) {
                    patch.interaction = Some(Interaction::LOCKED);
                }
                if !patch.is_empty() {
                    let src_changed = patch.src.is_some();
                    host.update_element(id, patch)?;
                    tracing::debug!(%id, src_changed, "refreshed background media element");
                }
                id
            }
            None => {
                let init =
                    ElementInit::background_media(&self.opts.role_flag, media.media_url(), size);
                let id = host.add_element(init, true)?;
                tracing::debug!(%id, "created background media element");
                id
            }
        };
        pin_to_back(host, id);
        Ok(id)
    }
}

fn pin_to_back<P: HostPage + ?Sized>(host: &mut P, id: ElementId) {
    if let Err(err) = host.move_to_back(id) {
        tracing::warn!(%id, error = %err, "could not move background media element to back");
    }
}

async fn place_media<P: HostPage>(
    page: Rc<RefCell<P>>,
    resolver: ImageSizeResolver,
    id: ElementId,
    media: MediaLayer,
    fallback: PageSize,
) -> BackgroundResult<()> {
    let natural = resolver.natural_size(media.media_url()).await;

    let mut host = page.borrow_mut();
    let Some(element) = host.element(id) else {
        tracing::debug!(%id, "background media element gone before geometry landed");
        return Ok(());
    };
    if element.src != media.media_url() {
        tracing::debug!(%id, "background media source changed before geometry landed");
        return Ok(());
    }

    let size = PageSize::or_fallback(host.size(), fallback);
    let geometry = resolve_geometry(size, natural, media.sizing, media.position);
    if element.geometry != geometry {
        host.update_element(id, ElementPatch::geometry(geometry))?;
    }
    pin_to_back(&mut *host, id);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/sync/synchronizer.rs"]
mod tests;
