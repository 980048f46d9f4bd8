pub const INDEX_HTML: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Drag and Drop File Upload</title>
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
            background: #fafafa;
            min-height: 100vh;
            padding: 60px 20px;
        }

        .container {
            max-width: 680px;
            margin: 0 auto;
            display: flex;
            flex-direction: column;
            gap: 20px;
        }

        h1 {
            color: #222;
            font-size: 1.9em;
            text-align: center;
            margin-bottom: 12px;
        }

        textarea {
            width: 100%;
            border: 1px solid #ddd;
            border-radius: 10px;
            padding: 12px;
            font: inherit;
            resize: vertical;
        }

        .card {
            background: white;
            border: 1px solid #e5e5e5;
            border-radius: 12px;
            padding: 20px;
        }

        .card-title {
            font-weight: 600;
            margin-bottom: 4px;
        }

        .card-description {
            color: #777;
            font-size: 0.9em;
            margin-bottom: 16px;
        }

        .upload-area {
            border: 2px dashed #ccc;
            border-radius: 10px;
            height: 130px;
            display: flex;
            flex-direction: column;
            align-items: center;
            justify-content: center;
            cursor: pointer;
            transition: all 0.2s;
        }

        .upload-area:hover {
            background: #f5f5f5;
        }

        .upload-area.dragover {
            border-color: #333;
            background: #f0f0f0;
        }

        .upload-area.disabled {
            opacity: 0.5;
            cursor: not-allowed;
        }

        input[type="file"] {
            display: none;
        }

        .file-row {
            display: flex;
            align-items: center;
            gap: 10px;
            border: 1px solid #eee;
            border-radius: 10px;
            padding: 8px;
            margin-top: 12px;
        }

        .file-row img {
            width: 80px;
            height: 80px;
            object-fit: cover;
            border-radius: 6px;
        }

        .file-info {
            flex: 1;
            min-width: 0;
        }

        .file-name {
            font-size: 0.9em;
            overflow: hidden;
            text-overflow: ellipsis;
            white-space: nowrap;
        }

        .progress {
            height: 4px;
            background: #eee;
            border-radius: 2px;
            margin-top: 6px;
        }

        .progress-bar {
            height: 100%;
            background: #333;
            border-radius: 2px;
            transition: width 0.1s;
        }

        .footer {
            display: flex;
            justify-content: space-between;
            align-items: center;
            margin-top: 16px;
            font-size: 0.8em;
            color: #777;
        }

        button {
            background: #222;
            color: white;
            border: none;
            border-radius: 8px;
            padding: 8px 18px;
            font: inherit;
            cursor: pointer;
        }

        button:disabled {
            opacity: 0.5;
            cursor: not-allowed;
        }

        button.ghost {
            background: transparent;
            color: #555;
            padding: 6px 10px;
        }

        .result {
            border: 1px solid #e5e5e5;
            border-radius: 10px;
            padding: 16px;
            background: white;
            display: none;
            flex-direction: column;
            gap: 12px;
            line-height: 1.6;
        }

        .result pre {
            background: #f5f5f5;
            padding: 10px;
            border-radius: 6px;
            overflow-x: auto;
        }

        .error {
            background: #fee;
            border: 1px solid #fcc;
            color: #c33;
            padding: 12px;
            border-radius: 10px;
            display: none;
        }

        .toast {
            position: fixed;
            bottom: 20px;
            right: 20px;
            background: #222;
            color: white;
            padding: 10px 16px;
            border-radius: 8px;
            opacity: 0;
            transition: opacity 0.3s;
        }

        .toast.visible {
            opacity: 1;
        }
    </style>
</head>
<body>
    <div class="container">
        <h1>Drag and Drop File Upload</h1>

        <div class="result" id="result">
            <div id="resultText"></div>
            <button id="closeButton">Close Explanation</button>
        </div>

        <div class="error" id="error"></div>

        <textarea id="prompt" rows="10" placeholder="Type your prompt here..."></textarea>

        <div class="card">
            <div class="card-title">File Upload</div>
            <div class="card-description">Drag and drop files or click to upload</div>

            <div class="upload-area" id="uploadArea">
                <div>&#8682;</div>
                <div>Drag files here or click to upload</div>
                <input type="file" id="fileInput" multiple>
            </div>

            <div id="fileList"></div>

            <div class="footer">
                <span id="fileCount">0/1 files uploaded</span>
                <button id="submitButton">Submit</button>
            </div>
        </div>
    </div>

    <div class="toast" id="toast"></div>

    <script>
        const uploadArea = document.getElementById('uploadArea');
        const fileInput = document.getElementById('fileInput');
        const promptInput = document.getElementById('prompt');
        const fileList = document.getElementById('fileList');
        const fileCount = document.getElementById('fileCount');
        const submitButton = document.getElementById('submitButton');
        const resultBox = document.getElementById('result');
        const resultText = document.getElementById('resultText');
        const closeButton = document.getElementById('closeButton');
        const errorDiv = document.getElementById('error');
        const toast = document.getElementById('toast');

        let sessionId = null;
        let config = null;
        let view = null;
        let pollTimer = null;
        let promptTimer = null;

        async function api(method, path, body, retried) {
            const options = { method };
            if (body instanceof FormData) {
                options.body = body;
            } else if (body !== undefined) {
                options.headers = { 'Content-Type': 'application/json' };
                options.body = JSON.stringify(body);
            }
            const response = await fetch(path, options);
            const sessionPath = '/api/sessions/' + sessionId;
            if (response.status === 404 && !retried && sessionId && path.startsWith(sessionPath)) {
                // The server dropped this widget; start a fresh one and retry once.
                const created = await api('POST', '/api/sessions');
                sessionId = created.id;
                render(created.view);
                const retryPath = '/api/sessions/' + sessionId + path.slice(sessionPath.length);
                return api(method, retryPath, body, true);
            }
            const text = await response.text();
            const data = text ? JSON.parse(text) : null;
            if (!response.ok) {
                throw new Error((data && data.error) || ('Request failed: ' + response.status));
            }
            return data;
        }

        function showToast(message) {
            toast.textContent = message;
            toast.classList.add('visible');
            setTimeout(() => toast.classList.remove('visible'), 2500);
        }

        function showError(message) {
            errorDiv.textContent = message || '';
            errorDiv.style.display = message ? 'block' : 'none';
        }

        function escapeHtml(text) {
            return text
                .replace(/&/g, '&amp;')
                .replace(/</g, '&lt;')
                .replace(/>/g, '&gt;');
        }

        function renderInline(text) {
            return escapeHtml(text)
                .replace(/`([^`]+)`/g, '<code>$1</code>')
                .replace(/\*\*([^*]+)\*\*/g, '<strong>$1</strong>')
                .replace(/\*([^*]+)\*/g, '<em>$1</em>');
        }

        function renderMarkdown(markdown) {
            const out = [];
            let inCode = false;
            let inList = false;
            for (const line of markdown.split('\n')) {
                if (line.startsWith('```')) {
                    if (inList) { out.push('</ul>'); inList = false; }
                    out.push(inCode ? '</pre>' : '<pre>');
                    inCode = !inCode;
                    continue;
                }
                if (inCode) {
                    out.push(escapeHtml(line));
                    continue;
                }
                const heading = line.match(/^(#{1,6})\s+(.*)$/);
                const item = line.match(/^\s*(?:[-*]|\d+\.)\s+(.*)$/);
                if (item) {
                    if (!inList) { out.push('<ul>'); inList = true; }
                    out.push('<li>' + renderInline(item[1]) + '</li>');
                    continue;
                }
                if (inList) { out.push('</ul>'); inList = false; }
                if (heading) {
                    const level = heading[1].length;
                    out.push('<h' + level + '>' + renderInline(heading[2]) + '</h' + level + '>');
                } else if (line.trim()) {
                    out.push('<p>' + renderInline(line) + '</p>');
                }
            }
            if (inList) out.push('</ul>');
            if (inCode) out.push('</pre>');
            return out.join('\n');
        }

        function render(next) {
            view = next;
            const full = view.files.length >= view.max_files;
            uploadArea.classList.toggle('disabled', full);

            fileList.innerHTML = '';
            for (const file of view.files) {
                const row = document.createElement('div');
                row.className = 'file-row';
                let thumb;
                if (file.preview) {
                    thumb = document.createElement('img');
                    thumb.alt = '';
                    thumb.src = file.preview;
                } else {
                    thumb = document.createElement('div');
                    thumb.textContent = '\u{1F4C4}';
                }
                row.appendChild(thumb);
                const info = document.createElement('div');
                info.className = 'file-info';
                info.innerHTML = '<div class="file-name"></div>' +
                    '<div class="progress"><div class="progress-bar"></div></div>';
                info.querySelector('.file-name').textContent = file.name;
                info.querySelector('.progress-bar').style.width = Number(file.progress) + '%';
                row.appendChild(info);
                const remove = document.createElement('button');
                remove.className = 'ghost';
                remove.textContent = '✕';
                remove.addEventListener('click', () => removeFile(file.id));
                row.appendChild(remove);
                fileList.appendChild(row);
            }

            fileCount.textContent = view.accepted_count + '/' + view.max_files + ' files uploaded';
            submitButton.disabled = view.loading;
            submitButton.textContent = view.loading ? 'Explaining...' : 'Submit';

            if (view.result) {
                resultText.innerHTML = renderMarkdown(view.result);
                resultBox.style.display = 'flex';
            } else {
                resultBox.style.display = 'none';
            }
            showError(view.error);
            if (document.activeElement !== promptInput) {
                promptInput.value = view.prompt;
            }

            const busy = view.loading || view.files.some((f) => !f.success);
            if (busy && !pollTimer) {
                pollTimer = setInterval(refresh, 100);
            } else if (!busy && pollTimer) {
                clearInterval(pollTimer);
                pollTimer = null;
            }
        }

        async function refresh() {
            try {
                render(await api('GET', '/api/sessions/' + sessionId));
            } catch (error) {
                showError(error.message);
            }
        }

        function matchesAccept(file) {
            const name = file.name.toLowerCase();
            return config.policy.accept.some(([pattern, extensions]) => {
                const typeMatch = pattern.endsWith('/*')
                    ? file.type.startsWith(pattern.slice(0, -1))
                    : file.type === pattern;
                return typeMatch || extensions.some((ext) => name.endsWith(ext));
            });
        }

        async function addFiles(files) {
            if (!view || view.files.length >= view.max_files) return;
            const room = view.max_files - view.files.length;
            const form = new FormData();
            let count = 0;
            for (const file of files) {
                if (count >= room) break;
                if (file.size > config.max_size_bytes || !matchesAccept(file)) continue;
                form.append('file', file, file.name);
                count += 1;
            }
            if (count === 0) return;
            try {
                const response = await api('POST', '/api/sessions/' + sessionId + '/files', form);
                render(response.view);
            } catch (error) {
                showError(error.message);
            }
        }

        async function removeFile(id) {
            try {
                const response = await api('DELETE', '/api/sessions/' + sessionId + '/files/' + id);
                render(response.view);
                if (response.removed) showToast('Removed file: ' + response.removed);
            } catch (error) {
                showError(error.message);
            }
        }

        uploadArea.addEventListener('click', () => {
            if (!uploadArea.classList.contains('disabled')) fileInput.click();
        });

        uploadArea.addEventListener('dragover', (e) => {
            e.preventDefault();
            uploadArea.classList.add('dragover');
        });

        uploadArea.addEventListener('dragleave', () => {
            uploadArea.classList.remove('dragover');
        });

        uploadArea.addEventListener('drop', (e) => {
            e.preventDefault();
            uploadArea.classList.remove('dragover');
            addFiles(e.dataTransfer.files);
        });

        fileInput.addEventListener('change', (e) => {
            addFiles(e.target.files);
            fileInput.value = '';
        });

        promptInput.addEventListener('input', () => {
            clearTimeout(promptTimer);
            promptTimer = setTimeout(() => {
                api('PUT', '/api/sessions/' + sessionId + '/prompt', { prompt: promptInput.value })
                    .catch((error) => showError(error.message));
            }, 150);
        });

        submitButton.addEventListener('click', async () => {
            clearTimeout(promptTimer);
            try {
                await api('PUT', '/api/sessions/' + sessionId + '/prompt', { prompt: promptInput.value });
                render(await api('POST', '/api/sessions/' + sessionId + '/submit'));
            } catch (error) {
                await refresh();
                showError(error.message);
            }
        });

        closeButton.addEventListener('click', async () => {
            try {
                render(await api('POST', '/api/sessions/' + sessionId + '/close'));
                promptInput.value = '';
            } catch (error) {
                showError(error.message);
            }
        });

        async function start() {
            config = await api('GET', '/api/config');
            const accept = config.policy.accept.flatMap(([pattern, extensions]) => [pattern, ...extensions]);
            fileInput.accept = accept.join(',');
            const created = await api('POST', '/api/sessions');
            sessionId = created.id;
            render(created.view);
        }

        start().catch((error) => showError(error.message));
    </script>
</body>
</html>
"#;
