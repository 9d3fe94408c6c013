use std::sync::Arc;

/// One acquired surface texture plus the encoder recording into it.
pub struct Frame {
    pub view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
    output: wgpu::SurfaceTexture,
    queue: Arc<wgpu::Queue>,
}

impl Frame {
    pub fn new(
        device: &wgpu::Device,
        queue: Arc<wgpu::Queue>,
        output: wgpu::SurfaceTexture,
    ) -> Self {
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder =
            device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("orrery-frame-encoder"),
            });

        Self {
            view,
            encoder,
            output,
            queue,
        }
    }

    pub fn encoder(&mut self) -> &mut wgpu::CommandEncoder {
        &mut self.encoder
    }

    pub fn submit(self) {
        let Self {
            encoder,
            output,
            queue,
            ..
        } = self;

        queue.submit(Some(encoder.finish()));
        output.present();
    }
}
