pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>rgen canvas</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 760px; margin: 2rem auto; padding: 0 1rem; color: #222; }
  label { display: block; margin: 1rem 0 .3rem; font-weight: 600; }
  input[type=text] { width: 100%; padding: .5rem; font-size: 1rem; }
  input[type=range] { width: 100%; }
  button { margin-top: 1rem; padding: .6rem 1.2rem; font-size: 1rem; cursor: pointer; }
  figure { margin: 2rem 0; }
  figure img { width: 100%; border-radius: 4px; }
  figcaption { color: #666; text-align: center; margin: .4rem 0; }
  .error { color: #b00020; margin-top: 1rem; }
  .status { color: #555; margin-top: 1rem; }
  .spinner { display: none; margin-top: 1rem; }
  .spinner.active { display: block; }
</style>
</head>
<body>
<h1>Text to image</h1>

<label for="prompt">Enter your prompt:</label>
<input id="prompt" type="text" value="Sunset on a beach">

<label for="count">How many images do you want to generate? <span id="count-value">1</span></label>
<input id="count" type="range" min="1" max="5" value="1">

<button id="generate">Generate Images</button>

<div id="spinner" class="spinner">Generating images...</div>
<div id="status" class="status"></div>
<div id="error" class="error"></div>
<div id="results"></div>

<script>
const countInput = document.getElementById('count');
countInput.addEventListener('input', () => {
  document.getElementById('count-value').textContent = countInput.value;
});

let sizeLabels = [];
fetch('/api/sizes').then(r => r.json()).then(sizes => {
  sizeLabels = sizes.map(s => s.label);
});

function downloadLink(artifact) {
  const link = document.createElement('a');
  link.href = `data:${artifact.mime};base64,${artifact.data}`;
  link.download = artifact.filename;
  link.textContent = artifact.label;
  return link;
}

function renderImage(view) {
  const figure = document.createElement('figure');
  if (view.preview) {
    const img = document.createElement('img');
    img.src = `data:image/png;base64,${view.preview}`;
    img.alt = view.caption;
    figure.appendChild(img);
  }
  const caption = document.createElement('figcaption');
  caption.textContent = view.caption;
  figure.appendChild(caption);

  const select = document.createElement('select');
  select.setAttribute('aria-label', `Select download size for Image ${view.index + 1}`);
  view.artifacts.forEach((artifact, i) => {
    const option = document.createElement('option');
    option.value = i;
    option.textContent = artifact.size;
    select.appendChild(option);
  });
  const slot = document.createElement('div');
  const show = () => {
    slot.replaceChildren();
    const artifact = view.artifacts[Number(select.value)];
    if (artifact) slot.appendChild(downloadLink(artifact));
  };
  select.addEventListener('change', show);
  figure.appendChild(select);
  figure.appendChild(slot);
  show();

  view.failures.forEach(f => {
    const note = document.createElement('div');
    note.className = 'error';
    note.textContent = `${f.size}: ${f.message}`;
    figure.appendChild(note);
  });
  return figure;
}

document.getElementById('generate').addEventListener('click', async () => {
  const button = document.getElementById('generate');
  const spinner = document.getElementById('spinner');
  const results = document.getElementById('results');
  const errorBox = document.getElementById('error');
  const status = document.getElementById('status');

  button.disabled = true;
  spinner.classList.add('active');
  errorBox.textContent = '';
  status.textContent = '';
  results.replaceChildren();

  try {
    const response = await fetch('/api/generate', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({
        prompt: document.getElementById('prompt').value,
        count: Number(countInput.value),
        sizes: sizeLabels,
      }),
    });
    const body = await response.json();
    if (!response.ok) {
      errorBox.textContent = body.message || 'Request failed';
      return;
    }
    status.textContent = `Running on: ${body.device}`;
    body.images.forEach(view => results.appendChild(renderImage(view)));
  } catch (e) {
    errorBox.textContent = `Request failed: ${e}`;
  } finally {
    spinner.classList.remove('active');
    button.disabled = false;
  }
});
</script>
</body>
</html>
"#;
